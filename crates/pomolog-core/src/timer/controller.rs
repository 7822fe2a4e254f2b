//! Session controller implementation.
//!
//! The controller is a pull-based state machine. It owns no thread and
//! keeps no wall clock -- the caller delivers one `tick()` per elapsed
//! second while the timer is running. Because commands and ticks arrive
//! on the same control thread, a tick delivered after a pause or stop
//! observes the new phase and is a no-op; there is no stale-callback
//! window to cancel.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running
//!           |
//!           v (expiry / stop)
//!         Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(Settings::default(), sink);
//! controller.start();
//! // One call per elapsed second:
//! controller.tick(); // Returns Some(event) when the session completes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::Settings;
use crate::events::{SessionAction, SessionEvent, SessionType};
use crate::sink::EventSink;

/// Run phase of the controller. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// Persistent controller fields, everything except the sink.
///
/// The CLI serializes this between invocations so `start`, `pause` and
/// friends operate on one continuous machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub settings: Settings,
    pub session: SessionType,
    pub time_remaining: u32,
    pub phase: TimerPhase,
    pub cycle_count: u32,
    pub session_count: u32,
    pub total_sessions: u64,
    pub completed_sessions: u64,
}

/// Read-only view for display collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub phase: TimerPhase,
    pub session: SessionType,
    pub time_remaining: u32,
    pub session_duration: u32,
    pub progress: f64,
    pub cycle_count: u32,
    pub session_count: u32,
    pub total_sessions: u64,
    pub completed_sessions: u64,
}

/// The session state machine.
///
/// Owns the injected event sink; every lifecycle event is submitted to
/// it fire-and-forget as it is emitted. Sink outcomes never feed back
/// into timer state.
pub struct SessionController<S> {
    settings: Settings,
    session: SessionType,
    /// Seconds left in the current session. Always within
    /// `[0, settings.duration_of(session)]`.
    time_remaining: u32,
    phase: TimerPhase,
    /// Full rotations through the long break, starting at 1.
    cycle_count: u32,
    /// Position within the current cycle, 1..=sessions_until_long_break.
    session_count: u32,
    /// Incremented on every session transition.
    total_sessions: u64,
    /// Incremented only on natural expiry.
    completed_sessions: u64,
    sink: S,
}

impl<S: EventSink> SessionController<S> {
    /// Create a fresh controller: idle at the start of a Work session.
    pub fn new(settings: Settings, sink: S) -> Self {
        Self {
            settings,
            session: SessionType::Work,
            time_remaining: settings.work_duration,
            phase: TimerPhase::Idle,
            cycle_count: 1,
            session_count: 1,
            total_sessions: 0,
            completed_sessions: 0,
            sink,
        }
    }

    /// Rebuild a controller from persisted state.
    ///
    /// `time_remaining` is clamped into `[0, duration_of(session)]` so a
    /// state written under different settings cannot break the invariant.
    pub fn restore(state: ControllerState, sink: S) -> Self {
        let limit = state.settings.duration_of(state.session);
        Self {
            settings: state.settings,
            session: state.session,
            time_remaining: state.time_remaining.min(limit),
            phase: state.phase,
            cycle_count: state.cycle_count.max(1),
            session_count: state.session_count.max(1),
            total_sessions: state.total_sessions,
            completed_sessions: state.completed_sessions,
            sink,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn session(&self) -> SessionType {
        self.session
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn total_sessions(&self) -> u64 {
        self.total_sessions
    }

    pub fn completed_sessions(&self) -> u64 {
        self.completed_sessions
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.settings.duration_of(self.session);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.time_remaining as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Persistent fields, for serialization between runs.
    pub fn state(&self) -> ControllerState {
        ControllerState {
            settings: self.settings,
            session: self.session,
            time_remaining: self.time_remaining,
            phase: self.phase,
            cycle_count: self.cycle_count,
            session_count: self.session_count,
            total_sessions: self.total_sessions,
            completed_sessions: self.completed_sessions,
        }
    }

    /// Build a full state snapshot for display.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            phase: self.phase,
            session: self.session,
            time_remaining: self.time_remaining,
            session_duration: self.settings.duration_of(self.session),
            progress: self.progress(),
            cycle_count: self.cycle_count,
            session_count: self.session_count,
            total_sessions: self.total_sessions,
            completed_sessions: self.completed_sessions,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the current session, or resume it when paused.
    /// Ignored while already running.
    pub fn start(&mut self) -> Option<SessionEvent> {
        match self.phase {
            TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                Some(self.emit(SessionAction::Resume))
            }
            TimerPhase::Idle => {
                self.phase = TimerPhase::Running;
                Some(self.emit(SessionAction::Start))
            }
            TimerPhase::Running => None, // Already running.
        }
    }

    /// Pause the running session. No-op in any other phase, including
    /// while already paused.
    pub fn pause(&mut self) -> Option<SessionEvent> {
        match self.phase {
            TimerPhase::Running => {
                self.phase = TimerPhase::Paused;
                Some(self.emit(SessionAction::Pause))
            }
            _ => None,
        }
    }

    /// Stop from any phase: the current session resets to its full
    /// duration and the controller goes idle. The emitted event carries
    /// the elapsed time before the reset.
    pub fn stop(&mut self) -> SessionEvent {
        let event = self.emit(SessionAction::Stop);
        self.time_remaining = self.settings.duration_of(self.session);
        self.phase = TimerPhase::Idle;
        event
    }

    /// Advance to the next session regardless of run phase. A running
    /// timer keeps running into the fresh countdown; otherwise the
    /// controller goes idle at the new session's full duration.
    pub fn skip(&mut self) -> SessionEvent {
        let event = self.emit(SessionAction::Skip);
        let was_running = self.phase == TimerPhase::Running;
        self.advance_session();
        if !was_running {
            self.phase = TimerPhase::Idle;
        }
        event
    }

    /// One elapsed second. Only meaningful while running; returns the
    /// `complete` event when this tick expires the session.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return Some(self.expire());
        }
        None
    }

    /// Replace the settings. When the current session's own duration
    /// changes while the timer is not running, the remaining time resets
    /// to the new duration immediately; other session types pick up
    /// their new duration the next time they are entered. A mid-run
    /// shrink clamps the remaining time to keep it within bounds.
    pub fn update_settings(&mut self, settings: Settings) {
        let old = self.settings.duration_of(self.session);
        let new = settings.duration_of(self.session);
        self.settings = settings;
        if self.phase != TimerPhase::Running && new != old {
            self.time_remaining = new;
        } else if self.time_remaining > new {
            self.time_remaining = new;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Natural expiry: the session ran its full course.
    fn expire(&mut self) -> SessionEvent {
        let event = self.emit(SessionAction::Complete);
        self.completed_sessions += 1;
        self.advance_session();
        // The next session is armed but not started -- the user starts
        // it manually.
        self.phase = TimerPhase::Idle;
        event
    }

    /// The cycle rule. After a Work session the count within the cycle
    /// advances; past the configured threshold the long break begins a
    /// new cycle, otherwise a short break follows. Breaks always return
    /// to Work.
    fn advance_session(&mut self) {
        match self.session {
            SessionType::Work => {
                self.session_count += 1;
                if self.session_count > self.settings.sessions_until_long_break {
                    self.session = SessionType::LongBreak;
                    self.time_remaining = self.settings.long_break;
                    self.cycle_count += 1;
                    self.session_count = 1;
                } else {
                    self.session = SessionType::ShortBreak;
                    self.time_remaining = self.settings.short_break;
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => {
                self.session = SessionType::Work;
                self.time_remaining = self.settings.work_duration;
            }
        }
        self.total_sessions += 1;
    }

    /// Build the event for `action` against pre-mutation state, submit
    /// it to the sink fire-and-forget, and return it.
    fn emit(&self, action: SessionAction) -> SessionEvent {
        let planned = self.settings.duration_of(self.session);
        let duration = match action {
            SessionAction::Complete => planned,
            _ => planned.saturating_sub(self.time_remaining),
        };
        let event = SessionEvent {
            session_type: self.session,
            action,
            timestamp: Utc::now(),
            duration,
            cycle_count: self.cycle_count,
            session_count: self.session_count,
        };
        self.sink.submit(&event);
        event
    }
}
