//! GoldMind Terminal - AI Gold Trading Assistant
//!
//! A terminal client for the GoldMind backend: upload trading material and
//! watch it get processed, ask questions against the accumulated knowledge,
//! follow live gold prices, and review what the assistant has learned.

pub mod api;
pub mod config;
pub mod error;
pub mod panels;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod tui;

use config::{AppConfig, Cli};
use error::Result;
use scheduler::MarketPollScheduler;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging and run the terminal app until the user quits
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_cli(&cli)?;
    init_logging(&config)?;

    tracing::info!("Starting GoldMind Terminal...");
    tracing::info!("Backend: {}", config.backend_url);

    let state = AppState::new(config)?;
    let (tx, rx) = panels::channel();

    // Scheduled market polls arrive on the same channel as task completions.
    MarketPollScheduler::new(tx.clone(), state.config.market_poll_interval).start();

    tui::run(state, tx, rx).await
}

/// Logs go to a file under the data directory; the terminal itself belongs
/// to the UI. Ephemeral runs log nowhere.
fn init_logging(config: &AppConfig) -> Result<()> {
    let writer: Box<dyn std::io::Write + Send> = if config.ephemeral {
        Box::new(std::io::sink())
    } else {
        std::fs::create_dir_all(&config.data_dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.data_dir.join("goldmind.log"))?;
        Box::new(file)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goldmind_terminal_lib=debug,info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(writer))
                .with_ansi(false),
        )
        .init();

    Ok(())
}
