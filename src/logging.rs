//! ログインフラモジュール

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログシステムを初期化
///
/// RUST_LOG環境変数でログレベルを設定可能。未設定の場合は`default_directive`を使う:
/// - error: エラーのみ
/// - warn: 警告以上
/// - info: 情報以上
/// - debug: デバッグ情報以上
/// - trace: すべて
///
/// 標準出力は勤務表の表示に使うため、ログは標準エラーに出す。
pub fn init(default_directive: &str) {
    let filter = build_filter(default_directive);

    // テストなどで二重に初期化された場合は既存のsubscriberを優先
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}

/// RUST_LOGを優先してフィルタを構築
fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}
