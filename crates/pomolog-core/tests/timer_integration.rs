//! Integration tests for the session cycle.
//!
//! These drive the controller through whole Pomodoro cycles with the
//! documented default settings, plus property tests over arbitrary
//! durations and command sequences.

use pomolog_core::{
    NullSink, SessionAction, SessionController, SessionType, Settings, TimerPhase,
};
use proptest::prelude::*;

fn default_controller() -> SessionController<NullSink> {
    SessionController::new(Settings::default(), NullSink)
}

#[test]
fn fourth_work_completion_starts_the_long_break() {
    // The documented scenario: {work:1500, short:300, long:900, untilLong:4}.
    let mut c = default_controller();

    // Reach the fourth work session by skipping through the first three
    // work/short-break pairs.
    for _ in 0..3 {
        c.skip();
        c.skip();
    }
    assert_eq!(c.session(), SessionType::Work);
    assert_eq!(c.session_count(), 4);
    assert_eq!(c.cycle_count(), 1);

    c.start();
    let mut completions = 0;
    for _ in 0..1500 {
        if let Some(event) = c.tick() {
            assert_eq!(event.action, SessionAction::Complete);
            assert_eq!(event.duration, 1500);
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
    assert_eq!(c.session(), SessionType::LongBreak);
    assert_eq!(c.time_remaining(), 900);
    assert_eq!(c.cycle_count(), 2);
    assert_eq!(c.session_count(), 1);
    assert_eq!(c.phase(), TimerPhase::Idle);
}

#[test]
fn two_full_cycles_by_natural_expiry() {
    let settings = Settings {
        work_duration: 3,
        short_break: 2,
        long_break: 4,
        sessions_until_long_break: 2,
    };
    let mut c = SessionController::new(settings, NullSink);

    let mut long_breaks = 0;
    // 2 cycles x (2 work + 1 short break + 1 long break) sessions.
    for _ in 0..8 {
        let expected = settings.duration_of(c.session());
        if c.session() == SessionType::LongBreak {
            long_breaks += 1;
        }
        c.start();
        let mut expired = false;
        for _ in 0..expected {
            expired |= c.tick().is_some();
        }
        assert!(expired);
    }
    assert_eq!(long_breaks, 2);
    assert_eq!(c.cycle_count(), 3);
    assert_eq!(c.completed_sessions(), 8);
    assert_eq!(c.total_sessions(), 8);
}

#[test]
fn stopped_session_does_not_count_as_completed() {
    let mut c = default_controller();
    c.start();
    for _ in 0..10 {
        c.tick();
    }
    c.stop();
    assert_eq!(c.completed_sessions(), 0);
    assert_eq!(c.total_sessions(), 0);
    assert_eq!(c.time_remaining(), 1500);
}

proptest! {
    /// After exactly `d` ticks from a fresh Work session the expiry
    /// fires once, with the remaining time hitting zero on that tick
    /// and not before.
    #[test]
    fn expiry_fires_after_exactly_duration_ticks(d in 1u32..3600) {
        let settings = Settings {
            work_duration: d,
            ..Settings::default()
        };
        let mut c = SessionController::new(settings, NullSink);
        c.start();
        for elapsed in 1..d {
            prop_assert!(c.tick().is_none());
            prop_assert_eq!(c.time_remaining(), d - elapsed);
        }
        let event = c.tick();
        prop_assert!(event.is_some());
        prop_assert_eq!(event.unwrap().action, SessionAction::Complete);
        prop_assert_eq!(c.completed_sessions(), 1);
    }

    /// Any command sequence keeps the remaining time within the current
    /// session's configured duration.
    #[test]
    fn remaining_time_stays_in_bounds(ops in prop::collection::vec(0u8..5, 0..200)) {
        let settings = Settings {
            work_duration: 30,
            short_break: 10,
            long_break: 20,
            sessions_until_long_break: 3,
        };
        let mut c = SessionController::new(settings, NullSink);
        for op in ops {
            match op {
                0 => { c.start(); }
                1 => { c.pause(); }
                2 => { c.stop(); }
                3 => { c.skip(); }
                _ => { c.tick(); }
            }
            let limit = c.settings().duration_of(c.session());
            prop_assert!(c.time_remaining() <= limit);
            prop_assert!(c.session_count() >= 1);
            prop_assert!(c.session_count() <= settings.sessions_until_long_break);
            prop_assert!(c.cycle_count() >= 1);
        }
    }

    /// Every advance -- skip or expiry -- bumps the monotonic session
    /// counter by exactly one.
    #[test]
    fn total_sessions_tracks_advances(skips in 0u64..20) {
        let mut c = default_controller();
        for _ in 0..skips {
            c.skip();
        }
        prop_assert_eq!(c.total_sessions(), skips);
    }
}
