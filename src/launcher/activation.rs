//! 仮想環境の有効化と無効化
//!
//! 有効化は環境変数の書き換えとして表現し、`ActivationGuard`が破棄されるときに
//! 元の値へ戻す。

use super::discovery::Environment;
use crate::error::LauncherError;
use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use tracing::debug;

const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
const VIRTUAL_ENV_PROMPT: &str = "VIRTUAL_ENV_PROMPT";
const PATH: &str = "PATH";
const PYTHONHOME: &str = "PYTHONHOME";

/// 子プロセスに渡す環境変数の集合
pub trait ProcessContext {
    fn var(&self, key: &str) -> Option<OsString>;
    fn set_var(&mut self, key: &str, value: &OsStr);
    fn remove_var(&mut self, key: &str);
    fn vars(&self) -> Vec<(OsString, OsString)>;
}

/// 実行中プロセスの環境変数
#[derive(Debug, Default)]
pub struct CurrentProcess;

impl ProcessContext for CurrentProcess {
    fn var(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }

    fn set_var(&mut self, key: &str, value: &OsStr) {
        env::set_var(key, value);
    }

    fn remove_var(&mut self, key: &str) {
        env::remove_var(key);
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        env::vars_os().collect()
    }
}

/// メモリ上の環境変数（プロセス全体に影響させたくない場合に使う）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<OsString, OsString>,
}

impl EnvSnapshot {
    /// 現在のプロセス環境を複製
    pub fn from_current() -> Self {
        env::vars_os().collect()
    }
}

impl FromIterator<(OsString, OsString)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (OsString, OsString)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl ProcessContext for EnvSnapshot {
    fn var(&self, key: &str) -> Option<OsString> {
        self.vars.get(OsStr::new(key)).cloned()
    }

    fn set_var(&mut self, key: &str, value: &OsStr) {
        self.vars.insert(key.into(), value.to_os_string());
    }

    fn remove_var(&mut self, key: &str) {
        self.vars.remove(OsStr::new(key));
    }

    fn vars(&self) -> Vec<(OsString, OsString)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// 有効化中の仮想環境
///
/// `deactivate`を呼ぶか、スコープを抜けた時点で変更前の環境変数に戻る。
pub struct ActivationGuard<'a, C: ProcessContext> {
    context: &'a mut C,
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl<'a, C: ProcessContext> ActivationGuard<'a, C> {
    /// 有効化後の環境変数
    pub fn context(&self) -> &C {
        &*self.context
    }

    /// 仮想環境を無効化
    pub fn deactivate(self) {
        // 復元はDropで行う
    }

    fn restore(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(value) => self.context.set_var(key, &value),
                None => self.context.remove_var(key),
            }
        }
        debug!("仮想環境を無効化しました");
    }
}

impl<C: ProcessContext> Drop for ActivationGuard<'_, C> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// 仮想環境を有効化
///
/// activateスクリプトと同じく`VIRTUAL_ENV`を設定し、実行ファイルのディレクトリを
/// `PATH`の先頭に加え、`PYTHONHOME`を外す。
pub fn activate<'a, C: ProcessContext>(
    context: &'a mut C,
    environment: &Environment,
) -> Result<ActivationGuard<'a, C>, LauncherError> {
    let old_path = context.var(PATH);
    let search_path = std::iter::once(environment.bin_dir())
        .chain(old_path.iter().flat_map(env::split_paths));
    let new_path = env::join_paths(search_path)
        .map_err(|e| LauncherError::ActivationFailed(e.to_string()))?;

    let saved = [VIRTUAL_ENV, VIRTUAL_ENV_PROMPT, PATH, PYTHONHOME]
        .into_iter()
        .map(|key| (key, context.var(key)))
        .collect();

    context.set_var(VIRTUAL_ENV, environment.path().as_os_str());
    context.set_var(VIRTUAL_ENV_PROMPT, OsStr::new(&environment.name()));
    context.set_var(PATH, &new_path);
    context.remove_var(PYTHONHOME);
    debug!("仮想環境を有効化しました: {}", environment.path().display());

    Ok(ActivationGuard { context, saved })
}
