//! Arbeitszeit - 勤務時間記録ツール

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod holidays;
pub mod launcher;
pub mod logging;
pub mod report;
pub mod schedule;
pub mod tracker;
