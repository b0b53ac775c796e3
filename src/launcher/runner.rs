//! 委譲先プログラムの起動

use super::activation::ProcessContext;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// 起動するプログラムと引数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

/// プログラムを同期的に実行し、終了コードを返す
pub trait Runner {
    fn run(&mut self, invocation: &Invocation, context: &dyn ProcessContext) -> io::Result<i32>;
}

/// 子プロセスとして実行するRunner
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    base_dir: PathBuf,
}

impl ProcessRunner {
    /// `base_dir`はパス区切りを含むプログラム名の解決基準
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// 有効化後の`PATH`でプログラムを探す
    fn resolve(&self, program: &OsString, context: &dyn ProcessContext) -> io::Result<PathBuf> {
        which::which_in(program, context.var("PATH"), &self.base_dir).map_err(|e| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: {}", program.to_string_lossy(), e),
            )
        })
    }
}

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation, context: &dyn ProcessContext) -> io::Result<i32> {
        let program = self.resolve(&invocation.program, context)?;
        debug!("起動: {} {:?}", program.display(), invocation.args);

        let status = Command::new(&program)
            .args(&invocation.args)
            .env_clear()
            .envs(context.vars())
            .status()?;

        Ok(exit_code(status))
    }
}

/// 終了ステータスを終了コードに変換
///
/// シグナルで終了した場合はシェルと同じく128+シグナル番号
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
