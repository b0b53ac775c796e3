//! ランチャー設定

use super::discovery::{AmbiguityPolicy, Layout};
use crate::error::{ConfigError, LauncherError};
use serde::Deserialize;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// ルートディレクトリを上書きする環境変数
pub const ROOT_ENV: &str = "ARBEITSZEIT_ROOT";

/// ルート直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// ランチャー設定
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// 仮想環境を探すディレクトリ
    pub root: PathBuf,
    /// 仮想環境ディレクトリ名の接頭辞
    pub venv_prefix: String,
    /// 委譲先プログラム
    pub program: String,
    /// 転送する引数の前に付ける引数
    ///
    /// 区切り文字を含む相対パスはルート基準に解決済み
    pub program_args: Vec<OsString>,
    /// 候補が複数ある場合の扱い
    pub on_ambiguity: AmbiguityPolicy,
    /// 仮想環境のディレクトリ構成
    pub layout: Layout,
}

/// TOML設定ファイル用構造体
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    venv_prefix: Option<String>,
    program: Option<String>,
    program_args: Option<Vec<String>>,
    on_ambiguity: Option<AmbiguityPolicy>,
}

impl LauncherConfig {
    /// デフォルト値で作成
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            venv_prefix: ".venv".to_string(),
            program: "arbeitszeit".to_string(),
            program_args: Vec::new(),
            on_ambiguity: AmbiguityPolicy::default(),
            layout: Layout::current(),
        }
    }

    /// 実行環境から設定を読み込む
    ///
    /// ルートは`ARBEITSZEIT_ROOT`、なければ実行ファイルの2階層上
    pub fn load() -> Result<Self, LauncherError> {
        let root = match env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => default_root()?,
        };
        Ok(Self::load_from(root)?)
    }

    /// `root/launcher.toml`を読み込む（なければデフォルト値）
    pub fn load_from(root: PathBuf) -> Result<Self, ConfigError> {
        let mut config = Self::new(root);

        let config_path = config.root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let file_config: FileConfig = toml::from_str(&content)?;
            config.merge_file_config(file_config);
        }

        config.validate()?;

        Ok(config)
    }

    /// ファイル設定をマージ
    fn merge_file_config(&mut self, file_config: FileConfig) {
        if let Some(prefix) = file_config.venv_prefix {
            self.venv_prefix = prefix;
        }
        if let Some(program) = file_config.program {
            self.program = program;
        }
        if let Some(args) = file_config.program_args {
            self.program_args = args
                .iter()
                .map(|arg| resolve_against_root(&self.root, arg))
                .collect();
        }
        if let Some(policy) = file_config.on_ambiguity {
            self.on_ambiguity = policy;
        }
    }

    /// 設定値をバリデート
    fn validate(&self) -> Result<(), ConfigError> {
        if self.venv_prefix.is_empty() {
            return Err(ConfigError::InvalidValue(
                "venv_prefix must not be empty".to_string(),
            ));
        }
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 区切り文字を含む相対パスをルート基準にする（`-`で始まるオプションは除く）
///
/// 子プロセスの作業ディレクトリは呼び出し元のままなので、設定ファイルに書いた
/// スクリプトのパスはここで解決しておく。それ以外の引数はそのまま渡す。
fn resolve_against_root(root: &Path, arg: &str) -> OsString {
    let has_separator = arg.contains('/') || arg.contains(std::path::MAIN_SEPARATOR);
    if has_separator && !arg.starts_with('-') && Path::new(arg).is_relative() {
        root.join(arg).into_os_string()
    } else {
        OsString::from(arg)
    }
}

/// 実行ファイルのあるディレクトリの2階層上
fn default_root() -> Result<PathBuf, LauncherError> {
    let exe = env::current_exe().map_err(LauncherError::RootUnavailable)?;
    let exe = fs::canonicalize(&exe).unwrap_or(exe);
    root_of(&exe).ok_or_else(|| {
        LauncherError::RootUnavailable(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} の2階層上がありません", exe.display()),
        ))
    })
}

fn root_of(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent()?.parent().map(Path::to_path_buf)
}
