//! # Pomolog Core Library
//!
//! Core business logic for the Pomolog Pomodoro session timer. The CLI
//! binary and the logging backend are thin layers over this library.
//!
//! ## Architecture
//!
//! - **Session controller**: a pull-based state machine; the caller
//!   delivers one `tick()` per elapsed second for countdown progress
//! - **Event sinks**: fire-and-forget delivery of lifecycle events to
//!   the HTTP backend or a local JSON log file
//! - **Storage**: TOML configuration plus a SQLite kv store that keeps
//!   controller state across CLI invocations
//!
//! ## Key Components
//!
//! - [`SessionController`]: the timer state machine
//! - [`SessionEvent`]: one immutable record per lifecycle point
//! - [`EventSink`] / [`HistorySource`]: the persistence seams
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod history;
pub mod sink;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, SinkError};
pub use events::{SessionAction, SessionEvent, SessionType};
pub use history::{HistorySummary, RECENT_HISTORY_LIMIT};
pub use sink::{EventSink, HistorySource, HttpEventSink, NullSink, SessionLog};
pub use storage::{Config, Database};
pub use timer::{ControllerState, SessionController, Settings, StateSnapshot, TimerPhase};
