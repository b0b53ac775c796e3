//! Arbeitszeit Launcher - 仮想環境を有効化して勤務時間記録ツールを起動する

use arbeitszeit::{launcher, logging};
use std::ffi::OsString;
use tracing::{debug, warn};

fn main() {
    logging::init("warn");

    // 割り込みは子プロセスに任せ、ランチャーは終了コードの回収と無効化まで続ける
    if let Err(e) = ctrlc::set_handler(|| debug!("割り込みを受信しました（子プロセスの終了を待機）")) {
        warn!("シグナルハンドラーを設定できません: {}", e);
    }

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let code = launcher::run_from_env(&args);
    std::process::exit(code);
}
