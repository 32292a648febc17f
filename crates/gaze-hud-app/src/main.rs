//! gaze-hud - eye-tracking HUD with gaze-to-world probing
//!
//! Usage:
//!   gaze-hud                          # Interactive terminal HUD
//!   gaze-hud --headless --ticks 100   # Run without a terminal, print telemetry
//!   gaze-hud --print-config           # Show the effective configuration

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use gaze_hud_config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gaze-hud", version, about = "Eye-tracking telemetry HUD")]
struct Cli {
    /// Config file (default: per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a terminal UI and print telemetry at the end
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value = "100")]
    ticks: u64,

    /// Seed for the simulated headset
    #[arg(long)]
    seed: Option<u64>,

    /// Log file for the interactive HUD
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.simulator.seed = Some(seed);
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Install the global subscriber. The interactive HUD owns the terminal, so
/// its logs go to a file.
fn init_tracing(config: &AppConfig, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = config
        .logging
        .file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("gaze-hud.log"));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    if cli.print_config {
        let text = config
            .to_toml_string()
            .context("Failed to render configuration")?;
        print!("{text}");
        return Ok(());
    }

    init_tracing(&config, cli.headless)?;
    info!("gaze-hud v{} starting", env!("CARGO_PKG_VERSION"));

    if cli.headless {
        let run = gaze_hud_app::run_headless(&config, cli.ticks);
        for line in run.report(config.display.precision) {
            println!("{line}");
        }
        return Ok(());
    }

    gaze_hud_app::run_interactive(config)
}
