//! Shared helpers for CLI commands.

use pomolog_core::{
    Config, CoreError, EventSink, HistorySource, HttpEventSink, NullSink, SessionLog,
};

/// Event sink per config: the HTTP backend when one is configured,
/// otherwise the local session log. The timer keeps working without a
/// sink, so an unavailable one degrades instead of failing the command.
pub fn open_sink(config: &Config) -> Box<dyn EventSink> {
    if let Some(url) = config.backend.url.as_deref() {
        match HttpEventSink::new(url) {
            Ok(sink) => return Box::new(sink),
            Err(e) => tracing::warn!("backend sink unavailable: {e}; falling back to local log"),
        }
    }
    match SessionLog::open_default() {
        Ok(log) => Box::new(log),
        Err(e) => {
            tracing::warn!("local session log unavailable: {e}; events will be dropped");
            Box::new(NullSink)
        }
    }
}

/// History source per config: the HTTP backend when configured,
/// otherwise the local session log.
pub fn open_history_source(config: &Config) -> Result<Box<dyn HistorySource>, CoreError> {
    if let Some(url) = config.backend.url.as_deref() {
        return Ok(Box::new(HttpEventSink::new(url)?));
    }
    Ok(Box::new(SessionLog::open_default()?))
}
