//! Read-only aggregation over persisted session events.

use crate::events::{SessionAction, SessionEvent};

/// How many events the recent-history view shows.
pub const RECENT_HISTORY_LIMIT: usize = 10;

/// Aggregate totals across a full event history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistorySummary {
    pub total_events: usize,
    pub completed_count: usize,
    /// Accumulated seconds across `complete` events only.
    pub total_elapsed_secs: u64,
}

/// Summarize a chronological event sequence. Only natural completions
/// count toward the totals; starts, pauses and skips do not.
pub fn summarize(events: &[SessionEvent]) -> HistorySummary {
    let mut summary = HistorySummary {
        total_events: events.len(),
        ..HistorySummary::default()
    };
    for event in events {
        if event.action == SessionAction::Complete {
            summary.completed_count += 1;
            summary.total_elapsed_secs += u64::from(event.duration);
        }
    }
    summary
}

/// The most recent `limit` events, newest first.
pub fn recent(events: &[SessionEvent], limit: usize) -> Vec<&SessionEvent> {
    events.iter().rev().take(limit).collect()
}

/// `"2h 5m"` / `"25m"` rendering used by the history display.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
