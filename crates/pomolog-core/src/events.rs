use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three interval kinds in a Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    /// Wire identifier, as persisted by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short-break",
            SessionType::LongBreak => "long-break",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SessionType::Work => "Work Session",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

/// Lifecycle action that produced a [`SessionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Start,
    Resume,
    Pause,
    Stop,
    Skip,
    Complete,
}

impl SessionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAction::Start => "start",
            SessionAction::Resume => "resume",
            SessionAction::Pause => "pause",
            SessionAction::Stop => "stop",
            SessionAction::Skip => "skip",
            SessionAction::Complete => "complete",
        }
    }
}

/// One record per lifecycle point, immutable once created.
///
/// The serde field names are the backend's persisted shape -- do not
/// rename them. `duration` is the full planned duration for `complete`
/// and elapsed seconds for every other action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_type: SessionType,
    pub action: SessionAction,
    pub timestamp: DateTime<Utc>,
    pub duration: u32,
    pub cycle_count: u32,
    pub session_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_to_backend_shape() {
        let event = SessionEvent {
            session_type: SessionType::ShortBreak,
            action: SessionAction::Complete,
            timestamp: "2026-03-01T09:30:00Z".parse().unwrap(),
            duration: 300,
            cycle_count: 1,
            session_count: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["session_type"], "short-break");
        assert_eq!(json["action"], "complete");
        assert_eq!(json["duration"], 300);
        assert_eq!(json["cycle_count"], 1);
        assert_eq!(json["session_count"], 2);
        assert!(json["timestamp"].as_str().unwrap().starts_with("2026-03-01T09:30:00"));
    }

    #[test]
    fn event_parses_browser_style_timestamps() {
        // The original frontend logged `new Date().toISOString()`.
        let json = r#"{
            "session_type": "work",
            "action": "start",
            "timestamp": "2026-03-01T09:30:00.000Z",
            "duration": 0,
            "cycle_count": 1,
            "session_count": 1
        }"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.session_type, SessionType::Work);
        assert_eq!(event.action, SessionAction::Start);
    }

    #[test]
    fn session_type_wire_names() {
        assert_eq!(SessionType::Work.as_str(), "work");
        assert_eq!(SessionType::ShortBreak.as_str(), "short-break");
        assert_eq!(SessionType::LongBreak.as_str(), "long-break");
    }
}
