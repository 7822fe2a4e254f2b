//! Event sink and history collaborators.
//!
//! The controller talks to persistence through two narrow seams:
//! submitting one event per lifecycle point, and fetching the full
//! history for display. Both sides are fire-and-forget from the
//! timer's perspective -- a failed submission is logged and dropped,
//! never retried, and never alters timer state.

mod http;
mod session_log;

pub use http::HttpEventSink;
pub use session_log::{SessionLog, LOG_FILE_NAME};

use crate::error::SinkError;
use crate::events::SessionEvent;

/// Receives each lifecycle event exactly once.
///
/// Implementations must not block the caller for longer than local
/// bookkeeping takes, and must swallow delivery failures (logging them
/// through `tracing`).
pub trait EventSink {
    fn submit(&self, event: &SessionEvent);
}

/// Read side of the backend: the full event history, chronological,
/// oldest first.
pub trait HistorySource {
    fn fetch_history(&self) -> Result<Vec<SessionEvent>, SinkError>;
}

/// Discards every event. Offline operation and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn submit(&self, _event: &SessionEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn submit(&self, event: &SessionEvent) {
        (**self).submit(event)
    }
}

impl<S: HistorySource + ?Sized> HistorySource for Box<S> {
    fn fetch_history(&self) -> Result<Vec<SessionEvent>, SinkError> {
        (**self).fetch_history()
    }
}
