//! 設定モジュール

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct Config {
    /// 勤務表CSVの保存ディレクトリ
    pub data_path: PathBuf,
    /// 記録後に表示する日数
    pub show_days_after_log: usize,
    /// 祝日の国コード
    pub holiday_country: String,
    /// 祝日の地域コード（州）
    pub holiday_subdivision: Option<String>,
    /// 未記録セルの表示文字列
    pub nan_replacement: String,
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = base_dir();

        Self {
            data_path: base_dir.join("data"),
            show_days_after_log: 7,
            holiday_country: "DE".to_string(),
            holiday_subdivision: None,
            nan_replacement: String::new(),
        }
    }
}

/// TOML設定ファイル用構造体
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    general: Option<GeneralSection>,
    holidays: Option<HolidaysSection>,
    display: Option<DisplaySection>,
}

#[derive(Debug, Deserialize, Default)]
struct GeneralSection {
    data_path: Option<PathBuf>,
    show_days_after_log: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct HolidaysSection {
    country: Option<String>,
    subdivision: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplaySection {
    nan_replacement: Option<String>,
}

impl Config {
    /// 設定を読み込む
    ///
    /// 優先順位: 設定ファイル > デフォルト値
    ///
    /// `path`を明示した場合はファイルが必須。省略時は`~/.arbeitszeit/config.toml`を探し、
    /// 存在しなければデフォルト値を使う。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                p.to_path_buf()
            }
            None => default_config_path(),
        };

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let file_config: FileConfig = toml::from_str(&content)?;
            config.merge_file_config(file_config, config_dir(&config_path));
        }

        config.validate()?;

        Ok(config)
    }

    /// ファイル設定をマージ
    ///
    /// 相対パスの`data_path`は設定ファイルのディレクトリ基準で解決する
    fn merge_file_config(&mut self, file_config: FileConfig, config_dir: &Path) {
        if let Some(general) = file_config.general {
            if let Some(path) = general.data_path {
                self.data_path = if path.is_absolute() {
                    path
                } else {
                    config_dir.join(path)
                };
            }
            if let Some(days) = general.show_days_after_log {
                self.show_days_after_log = days;
            }
        }
        if let Some(holidays) = file_config.holidays {
            if let Some(country) = holidays.country {
                self.holiday_country = country;
            }
            if holidays.subdivision.is_some() {
                self.holiday_subdivision = holidays.subdivision;
            }
        }
        if let Some(display) = file_config.display {
            if let Some(replacement) = display.nan_replacement {
                self.nan_replacement = replacement;
            }
        }
    }

    /// 設定値をバリデート
    fn validate(&self) -> Result<(), ConfigError> {
        if self.holiday_country.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "holidays.country must not be empty".to_string(),
            ));
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "general.data_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 設定・データの基準ディレクトリ
fn base_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".arbeitszeit")
}

/// デフォルトの設定ファイルパス
pub fn default_config_path() -> PathBuf {
    base_dir().join("config.toml")
}

fn config_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}
