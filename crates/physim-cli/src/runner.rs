//! Fixed-rate headless runner.
//!
//! Builds the configured simulation, steps it `ticks` times with a constant
//! `dt`, writes telemetry reports to the given writer and optionally saves
//! the final frame.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use physim::{
    HarmonicMotionSim, HarmonicTelemetry, LinearMotionSim, LinearTelemetry, Mass, Simulation,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, ConfigError, OutputFormat, Scenario};

/// The simulation being run, kept concrete so its telemetry can be serialized.
#[derive(Debug, Clone)]
pub enum Scene {
    /// Box on a floor.
    Linear(LinearMotionSim),
    /// Mass on a spring.
    Harmonic(HarmonicMotionSim),
}

impl Scene {
    /// Builds and parameterizes the simulation described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions or the mass are invalid.
    pub fn build(config: &Config) -> Result<Self, ConfigError> {
        let dimensions = config.dimensions()?;
        let scene = match config.scenario {
            Scenario::Linear => {
                let mut sim = LinearMotionSim::new(dimensions);
                sim.set_acceleration(config.acceleration);
                Self::Linear(sim)
            }
            Scenario::Harmonic => {
                let mut sim = HarmonicMotionSim::new(dimensions);
                sim.set_stiffness(config.stiffness);
                sim.set_mass(Mass::new(config.mass)?);
                sim.set_damping(config.damping);
                sim.set_amplitude(config.amplitude);
                Self::Harmonic(sim)
            }
        };
        Ok(scene)
    }

    /// The simulation behind the shared lifecycle.
    pub fn simulation(&mut self) -> &mut dyn Simulation {
        match self {
            Self::Linear(sim) => sim,
            Self::Harmonic(sim) => sim,
        }
    }

    /// Current telemetry values.
    pub fn telemetry(&self) -> Telemetry {
        match self {
            Self::Linear(sim) => Telemetry::Linear(sim.telemetry()),
            Self::Harmonic(sim) => Telemetry::Harmonic(sim.telemetry()),
        }
    }
}

/// Telemetry of either scenario, tagged with the scenario name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum Telemetry {
    /// Linear motion values.
    Linear(LinearTelemetry),
    /// Harmonic motion values.
    Harmonic(HarmonicTelemetry),
}

impl Telemetry {
    /// The overlay lines for these values.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Linear(t) => t.lines(),
            Self::Harmonic(t) => t.lines(),
        }
    }
}

/// One telemetry report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    /// Ticks completed.
    pub tick: u64,
    /// Simulated seconds.
    pub time: f64,
    /// Values at this tick.
    pub telemetry: Telemetry,
}

impl Report {
    /// Writes the report in `format`.
    ///
    /// # Errors
    ///
    /// Propagates write and serialization errors.
    pub fn write<W: Write>(&self, out: &mut W, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "tick {} (t = {:.3} s)", self.tick, self.time)?;
                for line in self.telemetry.lines() {
                    writeln!(out, "  {line}")?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Ticks simulated.
    pub ticks: u64,
    /// Simulated seconds.
    pub time: f64,
    /// Reports written.
    pub reports: usize,
    /// Telemetry after the last tick.
    pub last: Telemetry,
}

/// Paces ticks against the wall clock.
struct Pacer {
    period: Duration,
    next: Instant,
}

impl Pacer {
    fn new(rate: u32) -> Self {
        let period = Duration::from_secs(1) / rate.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            thread::sleep(remaining);
            self.next += self.period;
        } else {
            // Running behind: restart the schedule rather than bursting
            self.next = now + self.period;
        }
    }
}

/// Runs the configured simulation, writing reports to `out`.
///
/// Reports are written at tick 0, every `report_every` ticks, and after the
/// last tick. The final frame is drawn and, if configured, saved as PNG or
/// PPM.
///
/// # Errors
///
/// Returns an error if the simulation cannot be built, a report cannot be
/// written or the snapshot cannot be saved.
pub fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<Summary> {
    let mut scene = Scene::build(config)?;
    let snapshot = config.snapshot_target()?;
    let dt = config.dt();
    let mut pacer = config.realtime.then(|| Pacer::new(config.rate));

    info!(
        scenario = config.scenario.name(),
        ticks = config.ticks,
        rate = config.rate,
        realtime = config.realtime,
        "starting run"
    );

    let mut reports = 0;
    let mut report = |scene: &Scene, tick: u64, out: &mut W| -> anyhow::Result<()> {
        Report {
            tick,
            time: tick as f64 * dt,
            telemetry: scene.telemetry(),
        }
        .write(out, config.format)?;
        reports += 1;
        Ok(())
    };

    report(&scene, 0, out)?;
    for tick in 1..=config.ticks {
        scene.simulation().step(dt);

        let periodic = config.report_every > 0 && tick % config.report_every == 0;
        if periodic || tick == config.ticks {
            report(&scene, tick, out)?;
        }
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
    }
    out.flush()?;

    let frame = scene.simulation().draw();
    debug!(labels = frame.labels().len(), "final frame drawn");
    if let Some((path, format)) = snapshot {
        frame
            .canvas()
            .save(path, format)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), ?format, "snapshot written");
    }

    let summary = Summary {
        ticks: config.ticks,
        time: config.ticks as f64 * dt,
        reports,
        last: scene.telemetry(),
    };
    info!(ticks = summary.ticks, reports = summary.reports, "run finished");
    Ok(summary)
}
