//! Pomolog session logging backend.
//!
//! The persistence collaborator for the timer: accepts session event
//! records on `POST /log_session` and serves the accumulated history on
//! `GET /sessions`, stored as one JSON array on disk.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use pomolog_core::SessionLog;

mod api;

use api::{router, AppState};

#[derive(Parser)]
#[command(name = "pomolog-server", version, about = "Pomolog session logging backend")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
    /// Session log file (defaults to sessions.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let log = match args.log_file {
        Some(path) => SessionLog::new(path),
        None => SessionLog::open_default()?,
    };
    info!("session log at {}", log.path().display());

    let state = AppState::new(log);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("listening on {}", args.bind);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
