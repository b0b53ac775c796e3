//! 勤務記録モジュール

use crate::config::Config;
use crate::entry::{self, DayFraction};
use crate::error::{ScheduleError, TrackerError};
use crate::holidays::HolidayCalendar;
use crate::report::Report;
use crate::schedule::{Field, Schedule};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

/// 勤務記録
pub struct Tracker {
    config: Config,
}

impl Tracker {
    /// 新しいTrackerを作成
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 開始時刻を記録
    pub fn log_start(&self, date: NaiveDate, time: &str) -> Result<String, TrackerError> {
        let value = entry::parse_clock_time(time, "09:00")?;
        self.update(date, Field::StartTime, value.clone())?;
        Ok(value)
    }

    /// 終了時刻を記録
    pub fn log_end(&self, date: NaiveDate, time: &str) -> Result<String, TrackerError> {
        let value = entry::parse_clock_time(time, "17:00")?;
        self.update(date, Field::EndTime, value.clone())?;
        Ok(value)
    }

    /// 休憩時間を記録（分またはHH:MM）
    pub fn log_break(&self, date: NaiveDate, time: &str) -> Result<String, TrackerError> {
        let value = entry::parse_break_time(time)?;
        self.update(date, Field::BreakTime, value.clone())?;
        Ok(value)
    }

    /// 休暇を記録
    pub fn log_vacation(&self, date: NaiveDate, days: DayFraction) -> Result<(), TrackerError> {
        self.update(date, Field::Vacation, days.to_string())
    }

    /// 病欠を記録
    pub fn log_sick_leave(&self, date: NaiveDate, days: DayFraction) -> Result<(), TrackerError> {
        self.update(date, Field::SickLeave, days.to_string())
    }

    /// 月の勤務表を作成
    pub fn create(&self, date: NaiveDate) -> Result<Schedule, TrackerError> {
        let calendar = HolidayCalendar::for_year(
            &self.config.holiday_country,
            self.config.holiday_subdivision.as_deref(),
            date.year(),
        )
        .map_err(ScheduleError::from)?;
        debug!("{}年の祝日: {}件", date.year(), calendar.len());

        let schedule = Schedule::create(&self.config.data_path, date, &calendar)?;
        info!("勤務表を作成しました: {}", schedule.path().display());
        Ok(schedule)
    }

    /// 勤務表を表示
    ///
    /// `days`を指定した場合は`date`の日までの直近`days`日分
    pub fn show(&self, date: NaiveDate, days: Option<usize>) -> Result<(), TrackerError> {
        let schedule = Schedule::load(&self.schedule_path(date))?;
        let report = Report::new(self.config.nan_replacement.clone());
        report.print(schedule.window(date.day(), days));
        Ok(())
    }

    /// 記録後の確認表示
    pub fn show_recent(&self, date: NaiveDate) -> Result<(), TrackerError> {
        self.show(date, Some(self.config.show_days_after_log))
    }

    fn schedule_path(&self, date: NaiveDate) -> std::path::PathBuf {
        Schedule::file_path(&self.config.data_path, date)
    }

    /// 1セルを更新して保存。月のファイルがなければ作成する
    fn update(&self, date: NaiveDate, field: Field, value: String) -> Result<(), TrackerError> {
        let path = self.schedule_path(date);
        let mut schedule = if path.exists() {
            Schedule::load(&path)?
        } else {
            self.create(date)?
        };

        debug!("{:?} = {} ({})", field, value, date);
        schedule.set_field(date, field, value)?;
        schedule.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_tracker() -> (Tracker, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_path: temp_dir.path().join("data"),
            show_days_after_log: 3,
            holiday_country: "DE".to_string(),
            holiday_subdivision: Some("BY".to_string()),
            nan_replacement: String::new(),
        };
        (Tracker::new(config), temp_dir)
    }

    fn load(tracker: &Tracker, day: NaiveDate) -> Schedule {
        Schedule::load(&tracker.schedule_path(day)).unwrap()
    }

    #[test]
    fn test_log_start_creates_missing_month() {
        let (tracker, _temp_dir) = create_test_tracker();
        let day = date(2024, 1, 15);

        let value = tracker.log_start(day, "9:00").unwrap();
        assert_eq!(value, "09:00");

        let schedule = load(&tracker, day);
        assert_eq!(schedule.records().len(), 31);
        assert_eq!(schedule.records()[14].start_time, "09:00");
    }

    #[test]
    fn test_log_full_day() {
        let (tracker, _temp_dir) = create_test_tracker();
        let day = date(2024, 3, 4);

        tracker.log_start(day, "08:15").unwrap();
        tracker.log_end(day, "16:45").unwrap();
        assert_eq!(tracker.log_break(day, "45").unwrap(), "00:45");

        let record = load(&tracker, day).records()[3].clone();
        assert_eq!(record.start_time, "08:15");
        assert_eq!(record.end_time, "16:45");
        assert_eq!(record.break_time, "00:45");
    }

    #[test]
    fn test_log_vacation_and_sick_leave() {
        let (tracker, _temp_dir) = create_test_tracker();

        tracker.log_vacation(date(2024, 5, 2), DayFraction::Full).unwrap();
        tracker
            .log_sick_leave(date(2024, 5, 3), DayFraction::Half)
            .unwrap();

        let schedule = load(&tracker, date(2024, 5, 1));
        assert_eq!(schedule.records()[1].vacation, "1.0");
        assert_eq!(schedule.records()[2].sick_leave, "0.5");
    }

    #[test]
    fn test_invalid_time_leaves_no_file() {
        let (tracker, _temp_dir) = create_test_tracker();
        let day = date(2024, 1, 15);

        let result = tracker.log_end(day, "5pm");
        assert!(matches!(result, Err(TrackerError::EntryError(_))));
        assert!(!tracker.schedule_path(day).exists());
    }

    #[test]
    fn test_create_twice_fails() {
        let (tracker, _temp_dir) = create_test_tracker();
        let day = date(2024, 6, 1);

        tracker.create(day).unwrap();
        let result = tracker.create(day);
        assert!(matches!(
            result,
            Err(TrackerError::ScheduleError(ScheduleError::AlreadyExists(_)))
        ));
    }

    #[test]
    fn test_create_with_unknown_subdivision() {
        let (mut tracker, _temp_dir) = create_test_tracker();
        tracker.config.holiday_subdivision = Some("XX".to_string());

        let result = tracker.create(date(2024, 6, 1));
        assert!(matches!(
            result,
            Err(TrackerError::ScheduleError(ScheduleError::HolidayError(_)))
        ));
    }

    #[test]
    fn test_show_missing_month() {
        let (tracker, _temp_dir) = create_test_tracker();
        let result = tracker.show(date(2099, 1, 1), None);
        assert!(matches!(
            result,
            Err(TrackerError::ScheduleError(ScheduleError::NotFound(_)))
        ));
    }

    #[test]
    fn test_show_recent_after_log() {
        let (tracker, _temp_dir) = create_test_tracker();
        let day = date(2024, 1, 2);

        tracker.log_start(day, "09:00").unwrap();
        assert!(tracker.show_recent(day).is_ok());
    }

    #[test]
    fn test_schedule_path_uses_data_path() {
        let (tracker, temp_dir) = create_test_tracker();
        let path = tracker.schedule_path(date(2024, 11, 5));
        assert_eq!(
            path,
            temp_dir.path().join("data").join(PathBuf::from("schedule_2024-11.csv"))
        );
    }
}
