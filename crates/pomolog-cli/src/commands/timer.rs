use std::io::Write;

use clap::Subcommand;
use pomolog_core::history::format_duration;
use pomolog_core::{
    Config, ControllerState, CoreError, Database, EventSink, SessionController, TimerPhase,
};

use crate::common::open_sink;

const STATE_KEY: &str = "session_controller";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the current session, or resume from pause
    Start,
    /// Pause the running session
    Pause,
    /// Stop and reset the current session
    Stop,
    /// Skip to the next session
    Skip,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until the session ends
    Run,
}

type CliController = SessionController<Box<dyn EventSink>>;

fn load_controller(db: &Database, config: &Config) -> CliController {
    let sink = open_sink(config);
    if let Ok(Some(json)) = db.kv_get(STATE_KEY) {
        if let Ok(state) = serde_json::from_str::<ControllerState>(&json) {
            let mut controller = SessionController::restore(state, sink);
            // Settings edited since the state was saved apply now,
            // including the reset of an idle session's remaining time.
            if *controller.settings() != config.settings() {
                controller.update_settings(config.settings());
            }
            return controller;
        }
    }
    SessionController::new(config.settings(), sink)
}

fn save_controller(db: &Database, controller: &CliController) -> Result<(), CoreError> {
    let json = serde_json::to_string(&controller.state())?;
    db.kv_set(STATE_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), CoreError> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut controller = load_controller(&db, &config);

    match action {
        TimerAction::Start => match controller.start() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("already running"),
        },
        TimerAction::Pause => match controller.pause() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("not running"),
        },
        TimerAction::Stop => {
            let event = controller.stop();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Skip => {
            let event = controller.skip();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        }
        TimerAction::Run => run_countdown(&mut controller)?,
    }

    save_controller(&db, &controller)?;
    Ok(())
}

/// Foreground countdown: one tick per second until the session expires
/// or the user interrupts. Ticks and the interrupt are serialized on
/// one select loop, so no tick can land after the pause is taken.
fn run_countdown(controller: &mut CliController) -> Result<(), CoreError> {
    if controller.phase() != TimerPhase::Running {
        controller.start();
    }
    render(controller);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval.tick().await; // the first tick completes immediately
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(event) = controller.tick() {
                        println!();
                        println!(
                            "{} complete. Next: {} ({})",
                            event.session_type.display_name(),
                            controller.session().display_name(),
                            format_duration(u64::from(controller.time_remaining())),
                        );
                        break;
                    }
                    render(controller);
                }
                _ = tokio::signal::ctrl_c() => {
                    controller.pause();
                    println!();
                    println!("paused");
                    break;
                }
            }
        }
    });
    Ok(())
}

fn render(controller: &CliController) {
    let snap = controller.snapshot();
    let minutes = snap.time_remaining / 60;
    let seconds = snap.time_remaining % 60;
    print!(
        "\r{} {minutes:02}:{seconds:02}  (session {}/{}, cycle {})  ",
        snap.session.display_name(),
        snap.session_count,
        controller.settings().sessions_until_long_break,
        snap.cycle_count,
    );
    let _ = std::io::stdout().flush();
}
