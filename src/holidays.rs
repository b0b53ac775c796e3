//! 祝日カレンダーモジュール
//!
//! ドイツ（DE）の全国祝日と州ごとの祝日を年単位で計算する。

use crate::error::HolidayError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// 対応している州コード
const SUBDIVISIONS: [&str; 16] = [
    "BB", "BE", "BW", "BY", "HB", "HE", "HH", "MV", "NI", "NW", "RP", "SH", "SL", "SN", "ST", "TH",
];

/// 1年分の祝日
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// 国・州・年を指定して祝日を計算
    pub fn for_year(
        country: &str,
        subdivision: Option<&str>,
        year: i32,
    ) -> Result<Self, HolidayError> {
        if !country.trim().eq_ignore_ascii_case("DE") {
            return Err(HolidayError::UnsupportedCountry(country.to_string()));
        }

        let subdivision = match subdivision {
            Some(code) => {
                let code = code.trim().to_ascii_uppercase();
                if !SUBDIVISIONS.contains(&code.as_str()) {
                    return Err(HolidayError::UnknownSubdivision {
                        country: "DE".to_string(),
                        subdivision: code,
                    });
                }
                Some(code)
            }
            None => None,
        };

        let mut calendar = HolidayCalendar::default();
        calendar.populate_germany(year);
        if let Some(code) = subdivision.as_deref() {
            calendar.populate_subdivision(code, year);
        }

        Ok(calendar)
    }

    /// 祝日名を取得
    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// 祝日かどうか
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// 祝日の件数
    pub(crate) fn len(&self) -> usize {
        self.holidays.len()
    }

    /// 同じ日に複数の祝日がある場合は "; " で連結
    fn add(&mut self, date: Option<NaiveDate>, name: &str) {
        let Some(date) = date else {
            return;
        };
        self.holidays
            .entry(date)
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(name);
            })
            .or_insert_with(|| name.to_string());
    }

    /// 全国共通の祝日
    fn populate_germany(&mut self, year: i32) {
        let easter = easter_sunday(year);

        self.add(NaiveDate::from_ymd_opt(year, 1, 1), "Neujahr");
        self.add(easter.map(|e| e - Duration::days(2)), "Karfreitag");
        self.add(easter.map(|e| e + Duration::days(1)), "Ostermontag");
        self.add(NaiveDate::from_ymd_opt(year, 5, 1), "Erster Mai");
        self.add(easter.map(|e| e + Duration::days(39)), "Christi Himmelfahrt");
        self.add(easter.map(|e| e + Duration::days(50)), "Pfingstmontag");
        if year >= 1990 {
            self.add(NaiveDate::from_ymd_opt(year, 10, 3), "Tag der Deutschen Einheit");
        }
        // 宗教改革500周年は全国で祝日
        if year == 2017 {
            self.add(NaiveDate::from_ymd_opt(year, 10, 31), "Reformationstag");
        }
        self.add(NaiveDate::from_ymd_opt(year, 12, 25), "Erster Weihnachtstag");
        self.add(NaiveDate::from_ymd_opt(year, 12, 26), "Zweiter Weihnachtstag");
    }

    /// 州ごとの祝日
    fn populate_subdivision(&mut self, code: &str, year: i32) {
        let easter = easter_sunday(year);

        if matches!(code, "BW" | "BY" | "ST") {
            self.add(NaiveDate::from_ymd_opt(year, 1, 6), "Heilige Drei Könige");
        }
        if (code == "BE" && year >= 2019) || (code == "MV" && year >= 2023) {
            self.add(NaiveDate::from_ymd_opt(year, 3, 8), "Internationaler Frauentag");
        }
        if code == "BB" {
            self.add(easter, "Ostersonntag");
            self.add(easter.map(|e| e + Duration::days(49)), "Pfingstsonntag");
        }
        if matches!(code, "BW" | "BY" | "HE" | "NW" | "RP" | "SL") {
            self.add(easter.map(|e| e + Duration::days(60)), "Fronleichnam");
        }
        if code == "SL" {
            self.add(NaiveDate::from_ymd_opt(year, 8, 15), "Mariä Himmelfahrt");
        }
        if code == "TH" && year >= 2019 {
            self.add(NaiveDate::from_ymd_opt(year, 9, 20), "Weltkindertag");
        }
        let reformation = matches!(code, "BB" | "MV" | "SN" | "ST" | "TH")
            || (matches!(code, "HB" | "HH" | "NI" | "SH") && year >= 2018);
        if reformation && year != 2017 {
            self.add(NaiveDate::from_ymd_opt(year, 10, 31), "Reformationstag");
        }
        if matches!(code, "BW" | "BY" | "NW" | "RP" | "SL") {
            self.add(NaiveDate::from_ymd_opt(year, 11, 1), "Allerheiligen");
        }
        if code == "SN" {
            self.add(repentance_day(year), "Buß- und Bettag");
        }
    }
}

/// 復活祭の日曜日（グレゴリオ暦、匿名アルゴリズム）
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// 11月23日より前の最後の水曜日
fn repentance_day(year: i32) -> Option<NaiveDate> {
    (16..=22)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, 11, day))
        .find(|date| date.weekday() == Weekday::Wed)
}
