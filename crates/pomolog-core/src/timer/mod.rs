mod controller;
mod settings;

pub use controller::{ControllerState, SessionController, StateSnapshot, TimerPhase};
pub use settings::Settings;
