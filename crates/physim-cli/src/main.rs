#![forbid(unsafe_code)]

//! # physim
//!
//! Runs a physics simulation headless at a fixed tick rate.
//!
//! ## Usage
//!
//! ```bash
//! physim                                   # Linear motion, 10 s, at rest
//! physim -s linear --acceleration 12.5     # Push the box
//! physim -s harmonic --mass 0.5 -o out.ppm # Oscillate, save the last frame
//! physim diagnostics                       # Print the resolved settings
//! ```

use std::io;

use physim_cli::cli::{Cli, Command, LogLevel};
use physim_cli::config::Config;
use physim_cli::runner;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli)?;
    init_tracing(LogLevel::from_verbosity(config.verbosity));
    config.validate()?;

    match cli.command() {
        Command::Run => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            runner::run(&config, &mut out)?;
        }
        Command::Diagnostics => {
            println!("{}", config.to_diagnostic_string());
        }
    }

    Ok(())
}

/// Logs go to stderr so telemetry on stdout stays machine-readable.
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
