//! ログ出力
//!
//! パイプラインはレベル付きメッセージを `LogSink` に渡すだけで、
//! 出力先は呼び出し側が決める。本番では tracing に流す。

use crate::env::EnvVar;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// レベル付きメッセージの受け口
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }
}

/// tracing へ転送する LogSink
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        // tracing のマクロはレベルを定数で要求する
        match level {
            Level::ERROR => tracing::error!("{}", message),
            Level::WARN => tracing::warn!("{}", message),
            Level::INFO => tracing::info!("{}", message),
            Level::DEBUG => tracing::debug!("{}", message),
            _ => tracing::trace!("{}", message),
        }
    }
}

/// `-v` の回数からデフォルトのフィルタを決める
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// サブスクライバーを初期化（`NLX_LOG` が指定されていればそちらを優先）
pub fn init(verbose: u8) {
    let filter = EnvVar::log_filter()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(filter_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
