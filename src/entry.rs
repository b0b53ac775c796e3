//! 入力値モジュール
//!
//! コマンドラインから受け取った時刻・休憩時間・日数を勤務表のセル値に正規化する。

use crate::error::EntryError;
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

/// HH:MM形式の時刻を正規化（例: "9:05" -> "09:05"）
pub fn parse_clock_time(value: &str, example: &'static str) -> Result<String, EntryError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| EntryError::InvalidTime {
            value: value.to_string(),
            example,
        })
}

/// 休憩時間を正規化
///
/// `:`を含まない場合は分として解釈し、HH:MMに変換する。
pub fn parse_break_time(value: &str) -> Result<String, EntryError> {
    let value = value.trim();

    if !value.contains(':') {
        let minutes: i64 = value
            .parse()
            .map_err(|_| EntryError::InvalidBreak(value.to_string()))?;
        if minutes < 0 {
            return Err(EntryError::NegativeBreak);
        }
        return Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60));
    }

    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| EntryError::InvalidBreak(value.to_string()))
}

/// 休暇・病欠の日数（半日または全日）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFraction {
    Half,
    Full,
}

impl FromStr for DayFraction {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| EntryError::InvalidDayFraction(s.to_string()))?;

        if value == 0.5 {
            Ok(DayFraction::Half)
        } else if value == 1.0 {
            Ok(DayFraction::Full)
        } else {
            Err(EntryError::InvalidDayFraction(s.to_string()))
        }
    }
}

impl fmt::Display for DayFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFraction::Half => write!(f, "0.5"),
            DayFraction::Full => write!(f, "1.0"),
        }
    }
}
