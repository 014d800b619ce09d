//! Runtime configuration for `physim`.
//!
//! [`Config`] is the single source of truth for a run, independent of how
//! each value was specified. Values are resolved in this order, later ones
//! winning: built-in defaults, the JSON file given with `--config`, then
//! flags and `PHYSIM_*` environment variables.
//!
//! # Examples
//!
//! ```rust
//! use physim_cli::config::{Config, Scenario};
//!
//! let config = Config {
//!     scenario: Scenario::Harmonic,
//!     stiffness: 200.0,
//!     mass: 0.1,
//!     ..Config::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.dimensions().unwrap().height(), 600);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use physim::{Dimensions, Mass, PhysicsError, SnapshotFormat};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Runtime configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    // ========================================================================
    // World
    // ========================================================================
    /// Which simulation to run.
    pub scenario: Scenario,

    /// World width; the scenario default when unset.
    pub width: Option<u32>,

    /// World height; the scenario default when unset.
    pub height: Option<u32>,

    // ========================================================================
    // Clock
    // ========================================================================
    /// Number of ticks to simulate.
    pub ticks: u64,

    /// Ticks per simulated second.
    pub rate: u32,

    /// Whether to sleep between ticks to match the wall clock.
    pub realtime: bool,

    // ========================================================================
    // Physical parameters
    // ========================================================================
    /// Driving acceleration in m/s² (linear only).
    pub acceleration: f64,

    /// Release offset below equilibrium in pixels (harmonic only).
    pub amplitude: f64,

    /// Spring stiffness in N/m (harmonic only).
    pub stiffness: f64,

    /// Hanging mass in kg (harmonic only).
    pub mass: f64,

    /// Spring damping coefficient (harmonic only).
    pub damping: f64,

    // ========================================================================
    // Output
    // ========================================================================
    /// Telemetry is printed every this many ticks; 0 prints first and last only.
    pub report_every: u64,

    /// Telemetry output format.
    pub format: OutputFormat,

    /// Where to write the final frame, if anywhere.
    pub snapshot: Option<PathBuf>,

    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenario: Scenario::Linear,
            width: None,
            height: None,
            ticks: 600,
            rate: physim::TICK_RATE,
            realtime: false,
            acceleration: 0.0,
            amplitude: 100.0,
            stiffness: 50.0,
            mass: 1.0,
            damping: 1.0,
            report_every: 60,
            format: OutputFormat::Text,
            snapshot: None,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from CLI arguments.
    ///
    /// Starts from the `--config` file when one is given, then applies
    /// every flag that was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(scenario) = cli.scenario {
            config.scenario = scenario;
        }
        if cli.width.is_some() {
            config.width = cli.width;
        }
        if cli.height.is_some() {
            config.height = cli.height;
        }
        if let Some(ticks) = cli.ticks {
            config.ticks = ticks;
        }
        if let Some(rate) = cli.rate {
            config.rate = rate;
        }
        if cli.realtime {
            config.realtime = true;
        }
        if let Some(acceleration) = cli.acceleration {
            config.acceleration = acceleration;
        }
        if let Some(amplitude) = cli.amplitude {
            config.amplitude = amplitude;
        }
        if let Some(stiffness) = cli.stiffness {
            config.stiffness = stiffness;
        }
        if let Some(mass) = cli.mass {
            config.mass = mass;
        }
        if let Some(damping) = cli.damping {
            config.damping = damping;
        }
        if let Some(every) = cli.every {
            config.report_every = every;
        }
        if let Some(format) = cli.format {
            config.format = format;
        }
        if cli.snapshot.is_some() {
            config.snapshot.clone_from(&cli.snapshot);
        }
        if cli.verbose > 0 {
            config.verbosity = cli.verbose;
        }

        Ok(config)
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this struct.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// World dimensions for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if either side resolves to zero.
    pub fn dimensions(&self) -> Result<Dimensions, ConfigError> {
        let (width, height) = self.scenario.default_size();
        let dimensions = Dimensions::new(
            self.width.unwrap_or(width),
            self.height.unwrap_or(height),
        )?;
        Ok(dimensions)
    }

    /// Seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.rate)
    }

    /// Snapshot path and the format its extension names.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is neither `png` nor `ppm`.
    pub fn snapshot_target(&self) -> Result<Option<(&Path, SnapshotFormat)>, ConfigError> {
        self.snapshot
            .as_deref()
            .map(|path| {
                SnapshotFormat::from_path(path)
                    .map(|format| (path, format))
                    .ok_or_else(|| ConfigError::UnsupportedSnapshotFormat(path.to_path_buf()))
            })
            .transpose()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dimensions()?;

        if self.rate == 0 {
            return Err(ConfigError::ZeroRate);
        }

        for (name, value) in [
            ("acceleration", self.acceleration),
            ("amplitude", self.amplitude),
            ("stiffness", self.stiffness),
            ("damping", self.damping),
        ] {
            if !value.is_finite() {
                return Err(PhysicsError::NonFinite { name, value }.into());
            }
        }
        Mass::new(self.mass)?;

        self.snapshot_target()?;

        if let Some(dir) = self.snapshot.as_deref().and_then(Path::parent)
            && !dir.as_os_str().is_empty()
            && !dir.is_dir()
        {
            return Err(ConfigError::SnapshotDirNotFound(dir.to_path_buf()));
        }

        Ok(())
    }

    /// Export configuration as a diagnostic string.
    #[must_use]
    pub fn to_diagnostic_string(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Scenario: {}", self.scenario.name()));
        match self.dimensions() {
            Ok(d) => lines.push(format!("Size: {}x{}", d.width(), d.height())),
            Err(e) => lines.push(format!("Size: invalid ({e})")),
        }
        lines.push(format!("Ticks: {}", self.ticks));
        lines.push(format!("Rate: {} Hz", self.rate));
        lines.push(format!(
            "Realtime: {}",
            if self.realtime { "on" } else { "off" }
        ));
        match self.scenario {
            Scenario::Linear => {
                lines.push(format!("Acceleration: {} m/s²", self.acceleration));
            }
            Scenario::Harmonic => {
                lines.push(format!("Amplitude: {} px", self.amplitude));
                lines.push(format!("Stiffness: {} N/m", self.stiffness));
                lines.push(format!("Mass: {} kg", self.mass));
                lines.push(format!("Damping: {}", self.damping));
            }
        }
        lines.push(format!("Report every: {} ticks", self.report_every));
        lines.push(format!("Format: {:?}", self.format));
        if let Some(ref path) = self.snapshot {
            lines.push(format!("Snapshot: {}", path.display()));
        }
        lines.push(format!("Verbosity: {}", self.verbosity));

        lines.join("\n")
    }
}

/// Which simulation to run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// A box pushed along a floor.
    #[default]
    Linear,
    /// A mass on a damped spring.
    Harmonic,
}

impl Scenario {
    /// Lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Harmonic => "harmonic",
        }
    }

    /// World size used when none is configured.
    #[must_use]
    pub const fn default_size(self) -> (u32, u32) {
        match self {
            Self::Linear => (800, 400),
            Self::Harmonic => (800, 600),
        }
    }
}

/// Telemetry output format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The overlay lines, indented under a tick header.
    #[default]
    Text,
    /// One JSON object per report.
    Json,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid.
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Tick rate of zero.
    #[error("Tick rate must be at least 1 Hz")]
    ZeroRate,

    /// Snapshot path without a `.png` or `.ppm` extension.
    #[error("Unsupported snapshot format: {} (use .png or .ppm)", .0.display())]
    UnsupportedSnapshotFormat(PathBuf),

    /// Snapshot directory does not exist.
    #[error("Snapshot directory not found: {}", .0.display())]
    SnapshotDirNotFound(PathBuf),

    /// A physical parameter was rejected.
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["physim"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.scenario, Scenario::Linear);
        assert_eq!(config.ticks, 600);
        assert_eq!(config.rate, 60);
        assert_eq!(config.stiffness, 50.0);
        assert_eq!(config.mass, 1.0);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_scenario_sizes() {
        let mut config = Config::default();
        let d = config.dimensions().unwrap();
        assert_eq!((d.width(), d.height()), (800, 400));

        config.scenario = Scenario::Harmonic;
        let d = config.dimensions().unwrap();
        assert_eq!((d.width(), d.height()), (800, 600));

        config.width = Some(1024);
        let d = config.dimensions().unwrap();
        assert_eq!((d.width(), d.height()), (1024, 600));
    }

    #[test]
    fn config_from_cli_overrides() {
        let config = Config::from_cli(&cli(&[
            "-s",
            "harmonic",
            "--stiffness",
            "120",
            "--mass",
            "0.5",
            "-n",
            "30",
            "-vv",
        ]))
        .unwrap();

        assert_eq!(config.scenario, Scenario::Harmonic);
        assert_eq!(config.stiffness, 120.0);
        assert_eq!(config.mass, 0.5);
        assert_eq!(config.ticks, 30);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.amplitude, 100.0);
    }

    #[test]
    fn config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"scenario": "harmonic", "stiffness": 80.0, "ticks": 10, "format": "json"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = Config::from_cli(&cli(&["--config", path, "--ticks", "99"])).unwrap();

        assert_eq!(config.scenario, Scenario::Harmonic);
        assert_eq!(config.stiffness, 80.0);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.ticks, 99);
        assert_eq!(config.mass, 1.0);
    }

    #[test]
    fn config_file_errors() {
        let missing = Config::load(Path::new("/nonexistent/physim.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gravity": 9.81}}"#).unwrap();
        let unknown = Config::load(file.path());
        assert!(matches!(unknown, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config {
            scenario: Scenario::Harmonic,
            snapshot: Some(PathBuf::from("out.ppm")),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""scenario":"harmonic""#));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn config_validate_rejects_bad_values() {
        let config = Config {
            width: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Physics(PhysicsError::EmptyCanvas { .. }))
        ));

        let config = Config {
            rate: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRate)));

        let config = Config {
            mass: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Physics(PhysicsError::NonPositiveMass(_)))
        ));

        let config = Config {
            stiffness: f64::NAN,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stiffness"));
    }

    #[test]
    fn config_validate_snapshot_dir() {
        let config = Config {
            snapshot: Some(PathBuf::from("/nonexistent/dir/frame.ppm")),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnapshotDirNotFound(_))
        ));

        let config = Config {
            snapshot: Some(PathBuf::from("frame.ppm")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_snapshot_format_from_extension() {
        let config = Config {
            snapshot: Some(PathBuf::from("frame.PNG")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.snapshot_target().unwrap(),
            Some((Path::new("frame.PNG"), SnapshotFormat::Png))
        );

        let config = Config {
            snapshot: Some(PathBuf::from("frame.jpg")),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedSnapshotFormat(_))
        ));

        assert_eq!(Config::default().snapshot_target().unwrap(), None);
    }

    #[test]
    fn config_diagnostic_string() {
        let config = Config {
            scenario: Scenario::Harmonic,
            ..Config::default()
        };
        let diag = config.to_diagnostic_string();

        assert!(diag.contains("Scenario: harmonic"));
        assert!(diag.contains("Size: 800x600"));
        assert!(diag.contains("Stiffness: 50 N/m"));
        assert!(!diag.contains("Acceleration"));
        assert!(diag.contains("Verbosity: 0"));
    }
}
