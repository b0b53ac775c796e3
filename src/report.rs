//! レポートモジュール

use crate::schedule::{DayRecord, COLUMNS};

/// 勤務表の表形式出力
pub struct Report {
    nan_replacement: String,
}

impl Report {
    /// 新しいReportを作成
    pub fn new(nan_replacement: impl Into<String>) -> Self {
        Self {
            nan_replacement: nan_replacement.into(),
        }
    }

    /// 表を文字列として生成
    ///
    /// 列は右寄せ、未記録セルは`nan_replacement`に置き換える
    pub fn render(&self, records: &[DayRecord]) -> String {
        let rows: Vec<Vec<&str>> = records
            .iter()
            .map(|record| {
                record
                    .cells()
                    .iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            self.nan_replacement.as_str()
                        } else {
                            *cell
                        }
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .map(|row| display_width(row[i]))
                    .chain(std::iter::once(display_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(format_row(&COLUMNS, &widths));
        for row in &rows {
            lines.push(format_row(row, &widths));
        }

        lines.join("\n")
    }

    /// 表を出力
    pub fn print(&self, records: &[DayRecord]) {
        if records.is_empty() {
            println!("表示する記録はありません。");
            return;
        }
        println!("{}", self.render(records));
    }
}

/// 1行分を右寄せで整形
fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(display_width(cell));
            format!("{}{}", " ".repeat(padding), cell)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 表示幅（文字数）
fn display_width(s: &str) -> usize {
    s.chars().count()
}
