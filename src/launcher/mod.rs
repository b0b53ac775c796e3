//! ランチャーモジュール
//!
//! 仮想環境を探して有効化し、委譲先プログラムに引数をそのまま渡して実行する。
//! 終了コードは委譲先のものをそのまま返し、セットアップに失敗した場合だけ
//! `SETUP_FAILURE_EXIT_CODE`を返す。

pub mod activation;
pub mod config;
pub mod discovery;
pub mod runner;

pub use activation::{activate, ActivationGuard, CurrentProcess, EnvSnapshot, ProcessContext};
pub use config::LauncherConfig;
pub use discovery::{discover, AmbiguityPolicy, Environment, Layout};
pub use runner::{Invocation, ProcessRunner, Runner};

use crate::error::LauncherError;
use std::ffi::OsString;
use tracing::{debug, info};

/// 仮想環境が見つからないなどセットアップに失敗した場合の終了コード
pub const SETUP_FAILURE_EXIT_CODE: i32 = 127;

/// ランチャー
pub struct Launcher<R: Runner> {
    config: LauncherConfig,
    runner: R,
}

impl<R: Runner> Launcher<R> {
    /// 新しいLauncherを作成
    pub fn new(config: LauncherConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// 探索 → 有効化 → 実行 → 無効化
    ///
    /// 戻り値は委譲先の終了コード。無効化は実行に失敗しても必ず行う。
    pub fn launch<C: ProcessContext>(
        &mut self,
        args: &[OsString],
        context: &mut C,
    ) -> Result<i32, LauncherError> {
        let environment = discover(
            &self.config.root,
            &self.config.venv_prefix,
            self.config.layout,
            self.config.on_ambiguity,
        )?;
        info!("仮想環境: {}", environment.path().display());

        let invocation = self.invocation(args);

        let guard = activate(context, &environment)?;
        let status = self.runner.run(&invocation, guard.context());
        guard.deactivate();

        let code = status.map_err(|source| LauncherError::SpawnFailed {
            program: self.config.program.clone(),
            source,
        })?;
        debug!("終了コード: {}", code);
        Ok(code)
    }

    /// 終了コードに変換して実行
    ///
    /// セットアップ失敗は標準エラーに出力し、`SETUP_FAILURE_EXIT_CODE`を返す
    pub fn run<C: ProcessContext>(&mut self, args: &[OsString], context: &mut C) -> i32 {
        match self.launch(args, context) {
            Ok(code) => code,
            Err(e) => report_setup_failure(&e),
        }
    }

    /// 設定済みの先頭引数の後に呼び出し元の引数を順序どおり並べる
    fn invocation(&self, args: &[OsString]) -> Invocation {
        let args = self
            .config
            .program_args
            .iter()
            .cloned()
            .chain(args.iter().cloned())
            .collect();

        Invocation {
            program: OsString::from(&self.config.program),
            args,
        }
    }

    /// 委譲先の実行に使うRunner
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

/// 実行環境の設定でプロセスを起動し、終了コードを返す
pub fn run_from_env(args: &[OsString]) -> i32 {
    let config = match LauncherConfig::load() {
        Ok(config) => config,
        Err(e) => return report_setup_failure(&e),
    };
    debug!("ランチャー設定: {:?}", config);

    let runner = ProcessRunner::new(config.root.clone());
    Launcher::new(config, runner).run(args, &mut CurrentProcess)
}

fn report_setup_failure(err: &LauncherError) -> i32 {
    debug!("セットアップ失敗: {:?}", err);
    eprintln!("arbeitszeit-launcher: {}", err);
    SETUP_FAILURE_EXIT_CODE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    /// 呼び出しを記録するRunner
    #[derive(Default)]
    struct RecordingRunner {
        exit_code: i32,
        fail_spawn: bool,
        calls: Vec<Invocation>,
        virtual_env_seen: Option<OsString>,
    }

    impl Runner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation, context: &dyn ProcessContext) -> io::Result<i32> {
            self.calls.push(invocation.clone());
            self.virtual_env_seen = context.var("VIRTUAL_ENV");
            if self.fail_spawn {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
            }
            Ok(self.exit_code)
        }
    }

    fn make_env(root: &Path) {
        let env = Environment::new(root.join(".venv"), Layout::current());
        fs::create_dir_all(env.bin_dir()).unwrap();
        fs::write(env.activation_script(), "").unwrap();
    }

    fn build_launcher(root: &Path, runner: RecordingRunner) -> Launcher<RecordingRunner> {
        Launcher::new(LauncherConfig::new(root.to_path_buf()), runner)
    }

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    fn context() -> EnvSnapshot {
        [(OsString::from("PATH"), OsString::from("/usr/bin"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_missing_environment_is_setup_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut launcher = build_launcher(temp_dir.path(), RecordingRunner::default());

        let code = launcher.run(&args(&["start", "09:00"]), &mut context());
        assert_eq!(code, SETUP_FAILURE_EXIT_CODE);
        assert!(launcher.runner().calls.is_empty());
    }

    #[test]
    fn test_arguments_forwarded_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        make_env(temp_dir.path());
        let mut launcher = build_launcher(temp_dir.path(), RecordingRunner::default());

        let forwarded = args(&["--report", "2024-01", "", "with space", "--", "-x"]);
        let code = launcher.run(&forwarded, &mut context());

        assert_eq!(code, 0);
        assert_eq!(launcher.runner().calls.len(), 1);
        assert_eq!(launcher.runner().calls[0].program, OsString::from("arbeitszeit"));
        assert_eq!(launcher.runner().calls[0].args, forwarded);
    }

    #[test]
    fn test_program_args_come_first() {
        let temp_dir = TempDir::new().unwrap();
        make_env(temp_dir.path());
        let mut config = LauncherConfig::new(temp_dir.path().to_path_buf());
        config.program = "python".to_string();
        config.program_args = vec![OsString::from("src/arbeitszeitaufzeichnungsprogramm.py")];
        let mut launcher = Launcher::new(config, RecordingRunner::default());

        launcher.run(&args(&["show", "5"]), &mut context());

        let call = &launcher.runner().calls[0];
        assert_eq!(call.program, OsString::from("python"));
        assert_eq!(
            call.args,
            args(&["src/arbeitszeitaufzeichnungsprogramm.py", "show", "5"])
        );
    }

    #[test]
    fn test_exit_code_passthrough() {
        for expected in [0, 1, 2, 42, 255] {
            let temp_dir = TempDir::new().unwrap();
            make_env(temp_dir.path());
            let runner = RecordingRunner {
                exit_code: expected,
                ..Default::default()
            };
            let mut launcher = build_launcher(temp_dir.path(), runner);

            assert_eq!(launcher.run(&args(&[]), &mut context()), expected);
        }
    }

    #[test]
    fn test_environment_active_during_run_and_restored_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        make_env(temp_dir.path());
        let runner = RecordingRunner {
            exit_code: 2,
            ..Default::default()
        };
        let mut launcher = build_launcher(temp_dir.path(), runner);
        let original = context();
        let mut ctx = original.clone();

        let code = launcher.run(&args(&["end", "17:00"]), &mut ctx);

        assert_eq!(code, 2);
        assert_eq!(
            launcher.runner().virtual_env_seen,
            Some(temp_dir.path().join(".venv").into_os_string())
        );
        assert_eq!(ctx, original);
    }

    #[test]
    fn test_spawn_failure_is_setup_failure_and_restores_context() {
        let temp_dir = TempDir::new().unwrap();
        make_env(temp_dir.path());
        let runner = RecordingRunner {
            fail_spawn: true,
            ..Default::default()
        };
        let mut launcher = build_launcher(temp_dir.path(), runner);
        let original = context();
        let mut ctx = original.clone();

        let result = launcher.launch(&args(&["show"]), &mut ctx);

        assert!(matches!(result, Err(LauncherError::SpawnFailed { .. })));
        assert_eq!(ctx, original);
    }

    #[test]
    fn test_ambiguous_environments_not_invoked() {
        let temp_dir = TempDir::new().unwrap();
        make_env(temp_dir.path());
        let second = Environment::new(temp_dir.path().join(".venv-old"), Layout::current());
        fs::create_dir_all(second.bin_dir()).unwrap();
        fs::write(second.activation_script(), "").unwrap();
        let mut launcher = build_launcher(temp_dir.path(), RecordingRunner::default());

        let code = launcher.run(&args(&["show"]), &mut context());
        assert_eq!(code, SETUP_FAILURE_EXIT_CODE);
        assert!(launcher.runner().calls.is_empty());
    }
}
