mod app;
mod input;
mod render;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    process::ExitCode,
};

use pegsol_core::{
    config::{self, AppConfig},
    FileStore, Outcome, SaveManager, ScoreCategory, SessionController,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let layout = config
        .layout()
        .with_context(|| format!("cannot play layout '{}'", config.layout))?;
    info!(layout = layout.name(), save_dir = %config.save_dir.display(), "Starting pegsol");

    let store = FileStore::new(SaveManager::new(&config.save_dir), layout.name());
    let controller = SessionController::new(layout, store);
    let mut app = app::PegsolApp::new(controller);
    let outcome = app.run().await?;

    for line in app::outcome_lines(outcome) {
        println!("{line}");
    }
    Ok(exit_code(outcome))
}

fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Won {
            category: ScoreCategory::Cheater,
            ..
        } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("pegsol.log");

    let env_filter = EnvFilter::from_default_env();

    // File only: stdout is the game screen.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
