use chrono::Local;
use clap::Subcommand;
use pomolog_core::history;
use pomolog_core::{Config, CoreError, RECENT_HISTORY_LIMIT};

use crate::common::open_history_source;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show recent session events, newest first
    Show {
        /// How many events to display
        #[arg(long, default_value_t = RECENT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Aggregate totals across the full history
    Stats,
}

pub fn run(action: HistoryAction) -> Result<(), CoreError> {
    let config = Config::load_or_default();
    let source = open_history_source(&config)?;
    // A failed fetch propagates before anything is printed, leaving the
    // previous display untouched.
    let events = source.fetch_history()?;

    match action {
        HistoryAction::Show { limit } => {
            if events.is_empty() {
                println!("No sessions recorded yet.");
                return Ok(());
            }
            for event in history::recent(&events, limit) {
                let timestamp = event
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S");
                println!(
                    "{timestamp}  {:<11}  {:<8}  {}",
                    event.session_type.as_str(),
                    event.action.as_str(),
                    history::format_duration(u64::from(event.duration)),
                );
            }
        }
        HistoryAction::Stats => {
            let summary = history::summarize(&events);
            println!("Total events:       {}", summary.total_events);
            println!("Completed sessions: {}", summary.completed_count);
            println!(
                "Time completed:     {}",
                history::format_duration(summary.total_elapsed_secs)
            );
        }
    }
    Ok(())
}
