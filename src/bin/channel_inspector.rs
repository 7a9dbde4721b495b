//! Channel membership inspector.
//!
//! Lists the MSP identifiers of the organizations whose admins are part of
//! a channel's Application group, from a channel config decoded to JSON.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use orggen::inspector::{self, DEFAULT_CONFIG_PATH, DEFAULT_OUTPUT_PATH};

#[derive(Parser)]
#[command(name = "channel-inspector")]
#[command(about = "Extract Application-group admin MSP identifiers from a channel config")]
#[command(version)]
struct Cli {
    /// Decoded channel config (JSON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    input: PathBuf,

    /// File receiving one MSP identifier per line
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let identifiers = inspector::inspect_file(&cli.input, &cli.output)
        .with_context(|| format!("Failed to inspect channel config {}", cli.input.display()))?;

    for id in &identifiers {
        log::info!("Channel member: {}", id);
    }
    Ok(())
}
