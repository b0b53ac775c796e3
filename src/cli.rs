//! CLIモジュール

use crate::config::Config;
use crate::entry::DayFraction;
use crate::tracker::Tracker;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Arbeitszeit - 勤務時間記録ツール
#[derive(Parser, Debug)]
#[command(name = "arbeitszeit")]
#[command(about = "勤務時間記録ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 対象日（YYYY-MM-DD形式、デフォルト: 今日）
    #[arg(long, global = true, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// 設定ファイルのパス
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// サブコマンド
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 開始時刻を記録
    Start {
        /// 開始時刻（HH:MM形式）
        time: String,
    },
    /// 終了時刻を記録
    End {
        /// 終了時刻（HH:MM形式）
        time: String,
    },
    /// 休憩時間を記録
    Break {
        /// 休憩時間（分またはHH:MM形式）
        #[arg(allow_hyphen_values = true)]
        time: String,
    },
    /// 休暇を記録
    Vacation {
        /// 日数: 0.5 または 1.0
        days: DayFraction,
    },
    /// 病欠を記録
    Sick {
        /// 日数: 0.5 または 1.0
        days: DayFraction,
    },
    /// 勤務表を表示
    Show {
        /// 表示する日数（省略時は月全体）
        days: Option<usize>,
    },
    /// 新しい月の勤務表を作成
    Create,
}

/// YYYY-MM-DD形式の日付を解析
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("無効な日付 '{}'。YYYY-MM-DD形式で指定してください", value))
}

/// CLIエントリポイント
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    let config = Config::load(cli.config.as_deref())?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    debug!("対象日: {}", date);

    execute(&Tracker::new(config), command, date)
}

/// サブコマンドを実行
fn execute(tracker: &Tracker, command: Commands, date: NaiveDate) -> Result<()> {
    let message = match command {
        Commands::Start { time } => {
            let time = tracker.log_start(date, &time)?;
            format!("{} の開始時刻 {} を記録しました", date, time)
        }
        Commands::End { time } => {
            let time = tracker.log_end(date, &time)?;
            format!("{} の終了時刻 {} を記録しました", date, time)
        }
        Commands::Break { time } => {
            let time = tracker.log_break(date, &time)?;
            format!("{} の休憩時間 {} を記録しました", date, time)
        }
        Commands::Vacation { days } => {
            tracker.log_vacation(date, days)?;
            format!("{} の休暇 {} 日を記録しました", date, days)
        }
        Commands::Sick { days } => {
            tracker.log_sick_leave(date, days)?;
            format!("{} の病欠 {} 日を記録しました", date, days)
        }
        Commands::Show { days } => {
            tracker.show(date, days)?;
            return Ok(());
        }
        Commands::Create => {
            tracker.create(date)?;
            println!("{} の勤務表を作成しました", date.format("%Y-%m"));
            return Ok(());
        }
    };

    tracker.show_recent(date)?;
    println!("\n{}", message);
    Ok(())
}
