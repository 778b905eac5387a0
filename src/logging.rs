//! Logger setup and the diagnostics sink used by the tracker.

use log::info;

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Receives diagnostic records emitted while debug mode is on.
pub trait DebugSink {
    fn record(&self, tag: &str, message: &str);
}

/// Forwards records to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn record(&self, tag: &str, message: &str) {
        info!(target: "touchhelper::tracker", "{tag}:{message}");
    }
}
