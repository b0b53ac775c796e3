//! Arbeitszeit - 勤務時間記録ツール

use anyhow::Result;
use arbeitszeit::{cli, logging};

fn main() -> Result<()> {
    logging::init("warn");
    cli::run()
}
