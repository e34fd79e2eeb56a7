#![forbid(unsafe_code)]

mod animation;
mod assets;
mod config;
mod constants;
mod controller;
mod error;
mod gui;
mod input;
mod lifecycle;
mod state;
mod tray;
mod types;
mod window;

use std::path::PathBuf;

use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::PetConfig;

/// Transparent always-on-top desktop pet
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = PetConfig::load(cli.config.as_deref())?;
    info!("config={:#?}", config);

    gui::run_pet(config)?;
    info!("Goodbye");
    Ok(())
}
