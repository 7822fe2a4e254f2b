use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::events::SessionType;

/// Interval durations and cycle length. All durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_until_long_break: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
            sessions_until_long_break: 4,
        }
    }
}

impl Settings {
    /// Full configured duration of the given session type.
    pub fn duration_of(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Work => self.work_duration,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    /// Reject non-positive values. The controller assumes validated
    /// settings; callers feeding it user input go through here first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("timer.work_duration", self.work_duration),
            ("timer.short_break", self.short_break),
            ("timer.long_break", self.long_break),
            (
                "timer.sessions_until_long_break",
                self.sessions_until_long_break,
            ),
        ];
        for (key, value) in fields {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        }
        Ok(())
    }
}
