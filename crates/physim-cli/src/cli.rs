//! Command-line interface for `physim`.
//!
//! Every option is optional here so that values from a `--config` file are
//! only overridden by flags the user actually passed. Defaults live in
//! [`Config`](crate::config::Config).
//!
//! # Examples
//!
//! ```bash
//! # Ten seconds of linear motion at 12.5 m/s²
//! physim --scenario linear --acceleration 12.5 --ticks 600
//!
//! # A stiff, light oscillator, reported every tick as JSON
//! physim -s harmonic --stiffness 200 --mass 0.1 --every 1 --format json
//!
//! # Save the final frame
//! physim -s harmonic -n 45 -o frame.png
//!
//! # Show the resolved configuration
//! physim --config physim.json diagnostics
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{OutputFormat, Scenario};

/// Fixed-timestep physics simulations, run headless.
///
/// Steps a linear-motion or harmonic-motion simulation at a fixed rate,
/// printing telemetry as it goes and optionally saving the final frame.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "physim",
    author,
    version,
    about = "Fixed-timestep physics simulations, run headless",
    long_about = "Steps a linear-motion or harmonic-motion simulation at a fixed rate, \
                  printing telemetry and optionally saving the final frame as PNG or PPM."
)]
pub struct Cli {
    /// Simulation to run
    #[arg(long, short = 's', value_enum, env = "PHYSIM_SCENARIO", global = true)]
    pub scenario: Option<Scenario>,

    /// World width in pixels
    #[arg(long, env = "PHYSIM_WIDTH", global = true)]
    pub width: Option<u32>,

    /// World height in pixels
    #[arg(long, env = "PHYSIM_HEIGHT", global = true)]
    pub height: Option<u32>,

    /// Number of ticks to simulate
    #[arg(long, short = 'n', env = "PHYSIM_TICKS", global = true)]
    pub ticks: Option<u64>,

    /// Ticks per simulated second
    #[arg(long, env = "PHYSIM_RATE", global = true)]
    pub rate: Option<u32>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long, env = "PHYSIM_REALTIME", global = true)]
    pub realtime: bool,

    /// Driving acceleration in m/s² (linear)
    #[arg(long, allow_negative_numbers = true, env = "PHYSIM_ACCELERATION", global = true)]
    pub acceleration: Option<f64>,

    /// Release offset below equilibrium in pixels (harmonic)
    #[arg(long, allow_negative_numbers = true, env = "PHYSIM_AMPLITUDE", global = true)]
    pub amplitude: Option<f64>,

    /// Spring stiffness in N/m (harmonic)
    #[arg(long, allow_negative_numbers = true, env = "PHYSIM_STIFFNESS", global = true)]
    pub stiffness: Option<f64>,

    /// Hanging mass in kg (harmonic)
    #[arg(long, allow_negative_numbers = true, env = "PHYSIM_MASS", global = true)]
    pub mass: Option<f64>,

    /// Spring damping coefficient (harmonic)
    #[arg(long, allow_negative_numbers = true, env = "PHYSIM_DAMPING", global = true)]
    pub damping: Option<f64>,

    /// Print telemetry every N ticks (0 prints only the first and last)
    #[arg(long, env = "PHYSIM_EVERY", global = true)]
    pub every: Option<u64>,

    /// Telemetry output format
    #[arg(long, short = 'f', value_enum, env = "PHYSIM_FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write the final frame to this path (.png or .ppm)
    #[arg(long, short = 'o', env = "PHYSIM_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Load settings from a JSON file; flags override its values
    #[arg(long, short = 'c', env = "PHYSIM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Optional subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the simulation (default)
    #[default]
    Run,

    /// Show the resolved configuration and exit
    Diagnostics,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The subcommand to execute.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbose)
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Level for a `-v` count.
    #[must_use]
    pub const fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::try_parse_from(["physim"]).unwrap();

        assert!(cli.scenario.is_none());
        assert!(cli.ticks.is_none());
        assert!(cli.acceleration.is_none());
        assert!(cli.snapshot.is_none());
        assert!(!cli.realtime);
        assert_eq!(cli.command(), Command::Run);
    }

    #[test]
    fn cli_parses_scenario() {
        let cli = Cli::try_parse_from(["physim", "--scenario", "harmonic"]).unwrap();
        assert_eq!(cli.scenario, Some(Scenario::Harmonic));

        let cli = Cli::try_parse_from(["physim", "-s", "linear"]).unwrap();
        assert_eq!(cli.scenario, Some(Scenario::Linear));

        assert!(Cli::try_parse_from(["physim", "-s", "pendulum"]).is_err());
    }

    #[test]
    fn cli_parses_negative_acceleration() {
        let cli = Cli::try_parse_from(["physim", "--acceleration", "-12.5"]).unwrap();
        assert_eq!(cli.acceleration, Some(-12.5));

        let cli = Cli::try_parse_from(["physim", "--acceleration=-3"]).unwrap();
        assert_eq!(cli.acceleration, Some(-3.0));
    }

    #[test]
    fn cli_parses_harmonic_parameters() {
        let cli = Cli::try_parse_from([
            "physim",
            "-s",
            "harmonic",
            "--amplitude",
            "40",
            "--stiffness",
            "200",
            "--mass",
            "0.1",
            "--damping",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.amplitude, Some(40.0));
        assert_eq!(cli.stiffness, Some(200.0));
        assert_eq!(cli.mass, Some(0.1));
        assert_eq!(cli.damping, Some(0.0));
    }

    #[test]
    fn cli_parses_run_options() {
        let cli = Cli::try_parse_from([
            "physim",
            "-n",
            "120",
            "--rate",
            "30",
            "--every",
            "10",
            "--realtime",
            "-f",
            "json",
            "-o",
            "/tmp/frame.ppm",
        ])
        .unwrap();

        assert_eq!(cli.ticks, Some(120));
        assert_eq!(cli.rate, Some(30));
        assert_eq!(cli.every, Some(10));
        assert!(cli.realtime);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.snapshot, Some(PathBuf::from("/tmp/frame.ppm")));
    }

    #[test]
    fn cli_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["physim", "run", "-n", "5", "-s", "harmonic"]).unwrap();
        assert_eq!(cli.command(), Command::Run);
        assert_eq!(cli.ticks, Some(5));
        assert_eq!(cli.scenario, Some(Scenario::Harmonic));
    }

    #[test]
    fn cli_parses_verbose() {
        let cli = Cli::try_parse_from(["physim"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_level(), LogLevel::Warn);

        let cli = Cli::try_parse_from(["physim", "-v"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Info);

        let cli = Cli::try_parse_from(["physim", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Debug);

        let cli = Cli::try_parse_from(["physim", "-vvv"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Trace);
        assert_eq!(cli.log_level().as_filter(), "trace");
    }

    #[test]
    fn cli_parses_diagnostics_subcommand() {
        let cli = Cli::try_parse_from(["physim", "diagnostics"]).unwrap();
        assert_eq!(cli.command(), Command::Diagnostics);
    }

    #[test]
    fn cli_rejects_bad_numbers() {
        assert!(Cli::try_parse_from(["physim", "--ticks", "-1"]).is_err());
        assert!(Cli::try_parse_from(["physim", "--width", "wide"]).is_err());
    }

    #[test]
    fn cli_help_works() {
        let result = Cli::try_parse_from(["physim", "--help"]);
        // --help returns an error (but it's the "help" kind)
        assert!(result.is_err());
    }
}
