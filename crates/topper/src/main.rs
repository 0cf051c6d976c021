use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hotkey_registry::Key;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod app;
mod config;

use config::Config;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug)]
#[command(name = "topper")]
#[command(about = "Toggle a window with a global hotkey", long_about = None)]
struct Args {
    /// Path to RON configuration file
    config: Option<PathBuf>,

    /// Hotkey to bind, e.g. "ctrl+shift+enter" (repeatable, overrides the config)
    #[arg(short, long = "key")]
    keys: Vec<Key>,

    /// Set the log level
    #[arg(short, long, value_enum)]
    log_level: Option<LogLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Only initialize tracing if RUST_LOG is set or log level is explicitly provided
    if std::env::var("RUST_LOG").is_ok() || args.log_level.is_some() {
        let log_level = match args.log_level.unwrap_or(LogLevel::Info) {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .with(
                EnvFilter::from_default_env()
                    .add_directive(format!("hotkey_registry={log_level}").parse()?)
                    .add_directive(format!("topper={log_level}").parse()?),
            )
            .init();
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    }
    .with_hotkeys(args.keys);

    app::run(config)
}
