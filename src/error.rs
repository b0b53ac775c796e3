//! エラー型定義モジュール

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IOエラー: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML解析エラー: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("設定ファイルが見つかりません: {}", .0.display())]
    NotFound(PathBuf),

    #[error("無効な設定値: {0}")]
    InvalidValue(String),
}

/// 祝日カレンダーエラー
#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("未対応の国コード: {0}")]
    UnsupportedCountry(String),

    #[error("未知の地域コード: {country}-{subdivision}")]
    UnknownSubdivision { country: String, subdivision: String },
}

/// 入力値エラー
#[derive(Error, Debug, PartialEq)]
pub enum EntryError {
    #[error("無効な時刻形式 '{value}'。HH:MM形式で指定してください（例: {example}）")]
    InvalidTime { value: String, example: &'static str },

    #[error("無効な休憩時間 '{0}'。分（例: 60）またはHH:MM形式（例: 01:00）で指定してください")]
    InvalidBreak(String),

    #[error("休憩時間に負の値は指定できません")]
    NegativeBreak,

    #[error("無効な日数 '{0}'。0.5（半日）または1.0（全日）を指定してください")]
    InvalidDayFraction(String),
}

/// 勤務表エラー
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("IOエラー: {0}")]
    IoError(#[from] io::Error),

    #[error("CSVエラー: {0}")]
    CsvError(#[from] csv::Error),

    #[error("祝日エラー: {0}")]
    HolidayError(#[from] HolidayError),

    #[error("ファイル '{}' は既に存在します", .0.display())]
    AlreadyExists(PathBuf),

    #[error("勤務表が見つかりません: {}", .0.display())]
    NotFound(PathBuf),

    #[error("勤務表に日付 {0} の行がありません")]
    DayNotFound(String),
}

/// 記録処理エラー
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("{0}")]
    ScheduleError(#[from] ScheduleError),

    #[error("{0}")]
    EntryError(#[from] EntryError),
}

/// ランチャーエラー
///
/// いずれもセットアップ失敗として扱い、委譲先の終了コードとは区別する。
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("ルートディレクトリを特定できません: {0}")]
    RootUnavailable(io::Error),

    #[error("ランチャー設定エラー: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("'{}' に '{prefix}*' で始まる仮想環境が見つかりません", .root.display())]
    NoEnvironment { root: PathBuf, prefix: String },

    #[error("仮想環境の候補が複数あります: {}", format_candidates(.0))]
    AmbiguousEnvironment(Vec<PathBuf>),

    #[error("仮想環境の有効化に失敗: {0}")]
    ActivationFailed(String),

    #[error("'{program}' を起動できません: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
