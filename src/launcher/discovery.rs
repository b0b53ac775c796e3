//! 仮想環境の探索

use crate::error::LauncherError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 仮想環境のディレクトリ構成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `bin/activate`
    Posix,
    /// `Scripts\activate.bat`
    Windows,
}

impl Layout {
    /// 実行中のプラットフォームの構成
    pub fn current() -> Self {
        if cfg!(windows) {
            Layout::Windows
        } else {
            Layout::Posix
        }
    }

    /// 実行ファイルを置くディレクトリ名
    pub fn bin_dir_name(self) -> &'static str {
        match self {
            Layout::Posix => "bin",
            Layout::Windows => "Scripts",
        }
    }

    /// 有効化スクリプト名
    pub fn activation_script_name(self) -> &'static str {
        match self {
            Layout::Posix => "activate",
            Layout::Windows => "activate.bat",
        }
    }
}

/// 候補が複数見つかった場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// セットアップ失敗として候補を列挙する
    #[default]
    Fail,
    /// 名前順で最初の候補を使う
    First,
}

/// 探索で見つかった仮想環境
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    path: PathBuf,
    layout: Layout,
}

impl Environment {
    pub fn new(path: PathBuf, layout: Layout) -> Self {
        Self { path, layout }
    }

    /// 仮想環境ディレクトリ
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PATHの先頭に加えるディレクトリ
    pub fn bin_dir(&self) -> PathBuf {
        self.path.join(self.layout.bin_dir_name())
    }

    /// 有効化スクリプトのパス
    pub fn activation_script(&self) -> PathBuf {
        self.bin_dir().join(self.layout.activation_script_name())
    }

    /// プロンプト表示用の名前（ディレクトリ名）
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// `root`直下から`prefix`で始まる仮想環境を探す
///
/// 有効化スクリプトを持たないディレクトリは候補にしない。
pub fn discover(
    root: &Path,
    prefix: &str,
    layout: Layout,
    policy: AmbiguityPolicy,
) -> Result<Environment, LauncherError> {
    let mut candidates = candidates(root, prefix, layout)?;
    debug!("仮想環境の候補: {:?}", candidates);

    match candidates.len() {
        0 => Err(LauncherError::NoEnvironment {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
        }),
        1 => Ok(Environment::new(candidates.remove(0), layout)),
        _ => match policy {
            AmbiguityPolicy::First => Ok(Environment::new(candidates.remove(0), layout)),
            AmbiguityPolicy::Fail => Err(LauncherError::AmbiguousEnvironment(candidates)),
        },
    }
}

/// 条件を満たすディレクトリを名前順で列挙
fn candidates(root: &Path, prefix: &str, layout: Layout) -> Result<Vec<PathBuf>, LauncherError> {
    let entries = fs::read_dir(root).map_err(LauncherError::RootUnavailable)?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(LauncherError::RootUnavailable)?;
        // UTF-8でない名前も接頭辞だけで判定する
        if !entry
            .file_name()
            .as_encoded_bytes()
            .starts_with(prefix.as_bytes())
        {
            continue;
        }

        let path = entry.path();
        let environment = Environment::new(path.clone(), layout);
        if path.is_dir() && environment.activation_script().is_file() {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}
