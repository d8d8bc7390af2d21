use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// ログフィルタを指定する環境変数
pub const LOG_ENV: &str = "DAZL_LOG";

/// stderrへのログ出力を初期化（`--verbose` でdebugまで出す）
pub fn init(verbose: bool) {
    let default = if verbose { "dazl_rust=debug,info" } else { "warn" };
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| default.to_string());

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .with(EnvFilter::new(filter))
        .try_init();

    if result.is_ok() {
        debug!("logging initialised");
    }
}
