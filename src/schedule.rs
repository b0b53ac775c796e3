//! 勤務表モジュール
//!
//! 1か月分の勤務記録を`schedule_YYYY-MM.csv`として保存する。

use crate::error::ScheduleError;
use crate::holidays::HolidayCalendar;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 1日分の記録DTO
///
/// 空文字列は未記録を表す
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Is Holiday")]
    pub is_holiday: String,
    #[serde(rename = "Start Time", default)]
    pub start_time: String,
    #[serde(rename = "End Time", default)]
    pub end_time: String,
    #[serde(rename = "Break Time", default)]
    pub break_time: String,
    #[serde(rename = "Vacation", default)]
    pub vacation: String,
    #[serde(rename = "Sick Leave", default)]
    pub sick_leave: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

/// 表示・更新対象の列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StartTime,
    EndTime,
    BreakTime,
    Vacation,
    SickLeave,
}

/// 勤務表の列見出し
pub const COLUMNS: [&str; 8] = [
    "Date",
    "Is Holiday",
    "Start Time",
    "End Time",
    "Break Time",
    "Vacation",
    "Sick Leave",
    "Notes",
];

impl DayRecord {
    /// 列見出しと同じ順序のセル値
    pub fn cells(&self) -> [&str; 8] {
        [
            self.date.as_str(),
            self.is_holiday.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.break_time.as_str(),
            self.vacation.as_str(),
            self.sick_leave.as_str(),
            self.notes.as_str(),
        ]
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::StartTime => self.start_time = value,
            Field::EndTime => self.end_time = value,
            Field::BreakTime => self.break_time = value,
            Field::Vacation => self.vacation = value,
            Field::SickLeave => self.sick_leave = value,
        }
    }
}

/// 1か月分の勤務表
#[derive(Debug)]
pub struct Schedule {
    path: PathBuf,
    records: Vec<DayRecord>,
}

impl Schedule {
    /// 対象月の勤務表ファイルパス
    ///
    /// 形式: schedule_YYYY-MM.csv
    pub fn file_path(data_dir: &Path, date: NaiveDate) -> PathBuf {
        data_dir.join(format!(
            "schedule_{}-{:02}.csv",
            date.year(),
            date.month()
        ))
    }

    /// 新しい月の勤務表を作成
    ///
    /// 全日の行を作り、祝日は`Is Holiday`と`Notes`を埋める。既存ファイルは上書きしない。
    pub fn create(
        data_dir: &Path,
        date: NaiveDate,
        calendar: &HolidayCalendar,
    ) -> Result<Self, ScheduleError> {
        fs::create_dir_all(data_dir)?;

        let path = Self::file_path(data_dir, date);
        if path.exists() {
            return Err(ScheduleError::AlreadyExists(path));
        }

        let records = month_days(date)
            .map(|day| {
                let is_holiday = calendar.is_holiday(day);
                DayRecord {
                    date: day.format("%Y-%m-%d").to_string(),
                    is_holiday: if is_holiday { "True" } else { "False" }.to_string(),
                    notes: calendar.name(day).unwrap_or_default().to_string(),
                    ..Default::default()
                }
            })
            .collect();

        let schedule = Self { path, records };
        schedule.save()?;
        Ok(schedule)
    }

    /// 勤務表を読み込む
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        if !path.exists() {
            return Err(ScheduleError::NotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// 勤務表を書き出す
    pub fn save(&self) -> Result<(), ScheduleError> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 指定日の列を更新（保存は呼び出し側）
    pub fn set_field(
        &mut self,
        date: NaiveDate,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), ScheduleError> {
        let key = date.format("%Y-%m-%d").to_string();
        let record = self
            .records
            .iter_mut()
            .find(|r| r.date == key)
            .ok_or(ScheduleError::DayNotFound(key))?;
        record.set(field, value.into());
        Ok(())
    }

    /// `day`日目までの直近`days`件（`None`なら月全体）
    pub fn window(&self, day: u32, days: Option<usize>) -> &[DayRecord] {
        match days {
            None => &self.records,
            Some(days) => {
                let end = self.records.len().min(day as usize);
                let start = end.saturating_sub(days);
                &self.records[start..end]
            }
        }
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 対象月の全日
fn month_days(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = date.month();
    let first = date.with_day(1).unwrap_or(date);
    first.iter_days().take_while(move |d| d.month() == month)
}
