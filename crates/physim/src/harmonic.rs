//! Simple harmonic motion: a mass hanging from the ceiling on a damped spring.
//!
//! The anchor sits horizontally centred 50 px below the top edge. The body
//! starts `amplitude` pixels below equilibrium (anchor + rest length) and is
//! released from rest. Because the body is always directly below the anchor
//! the spring acts purely vertically.
//!
//! Amplitude, stiffness and mass changes all restart the oscillation. A mass
//! change replaces the body (its inertia depends on the mass) and recreates
//! the spring coupling with the current stiffness.

use tracing::debug;

use crate::body::{DynamicBody, Mass, Shape};
use crate::raster::{Frame, Rgb};
use crate::sim::{Dimensions, Simulation};
use crate::spring::{DampedSpring, SpringCoefficients, natural_frequency, period};
use crate::vector::Vec2;
use crate::world::{Segment, StaticAnchor, World};

const ANCHOR_Y: f64 = 50.0;
const ANCHOR_RADIUS: f64 = 5.0;

const REST_LENGTH: f64 = 150.0;
const DEFAULT_STIFFNESS: f64 = 50.0;
const DEFAULT_DAMPING: f64 = 1.0;
const DEFAULT_AMPLITUDE: f64 = 100.0;
const DEFAULT_SPRING: DampedSpring =
    DampedSpring::new(REST_LENGTH, DEFAULT_STIFFNESS, DEFAULT_DAMPING);

const MASS_RADIUS: f64 = 25.0;

const SPRING_COILS: usize = 10;
const COIL_WIDTH: f64 = 15.0;

const BG_COLOR: Rgb = Rgb::WHITE;
const MASS_COLOR: Rgb = Rgb::new(55, 65, 81);
const SPRING_COLOR: Rgb = Rgb::new(150, 75, 0);
const CEILING_COLOR: Rgb = Rgb::new(209, 213, 219);

/// Numbers shown by [`HarmonicMotionSim::draw`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HarmonicTelemetry {
    /// Natural frequency `√(k/m) / 2π` in hertz; zero when undefined.
    pub frequency: f64,
    /// `1 / frequency`; infinite when the frequency is zero.
    pub period: f64,
    /// Vertical offset from equilibrium, positive downward.
    pub displacement: f64,
    /// Vertical velocity, positive downward.
    pub velocity: f64,
    /// Spring stiffness `k`.
    pub stiffness: f64,
    /// Body mass `m`.
    pub mass: f64,
}

impl HarmonicTelemetry {
    /// The six overlay lines: four on the left, then two on the right.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Frequency (Hz): {:.2}", self.frequency),
            format!("Period (s): {:.2}", self.period),
            format!("Displacement (m): {:.2}", self.displacement),
            format!("Velocity (m/s): {:.2}", self.velocity),
            format!("Spring Const (N/m): {:.2}", self.stiffness),
            format!("Mass (kg): {:.2}", self.mass),
        ]
    }
}

/// A mass on a damped spring, oscillating vertically below a ceiling anchor.
///
/// # Example
///
/// ```rust
/// use physim::{Dimensions, HarmonicMotionSim, Simulation};
///
/// let mut sim = HarmonicMotionSim::new(Dimensions::new(800, 600)?);
/// assert_eq!(sim.telemetry().displacement, 100.0);
///
/// // Released from rest below equilibrium, it starts moving up
/// sim.tick();
/// assert!(sim.telemetry().velocity < 0.0);
/// # Ok::<(), physim::PhysicsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HarmonicMotionSim {
    world: World,
    frame: Frame,
    amplitude: f64,
    elapsed: f64,
}

impl HarmonicMotionSim {
    /// Creates the simulation with k = 50, m = 1, c = 1 and amplitude 100.
    pub fn new(dimensions: Dimensions) -> Self {
        let body = DynamicBody::new(
            Mass::ONE,
            Shape::Circle {
                radius: MASS_RADIUS,
            },
        );
        let world = World::new(dimensions, ceiling_anchor(dimensions), body)
            .with_coupling(DEFAULT_SPRING);

        let mut sim = Self {
            world,
            frame: Frame::new(dimensions),
            amplitude: DEFAULT_AMPLITUDE,
            elapsed: 0.0,
        };
        sim.reset();
        sim
    }

    /// Sets the release offset below equilibrium and restarts.
    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
        debug!(amplitude, "amplitude changed");
        self.reset();
    }

    /// Sets the spring stiffness in place and restarts.
    ///
    /// The value is not range-checked; a negative stiffness reports a
    /// frequency of zero.
    pub fn set_stiffness(&mut self, stiffness: f64) {
        if let Some(spring) = self.world.coupling_mut() {
            spring.set_stiffness(stiffness);
        }
        debug!(stiffness, "stiffness changed");
        self.reset();
    }

    /// Replaces the body with one of the new mass and restarts.
    ///
    /// The replacement gets fresh inertia for `mass` and inherits the old
    /// body's position and velocity; the spring is recreated between the
    /// anchor and the new body with the current stiffness and damping.
    pub fn set_mass(&mut self, mass: Mass) {
        let spring = self.spring();
        let replacement = self.world.body().with_mass(mass);
        let old = self.world.replace_body(replacement);
        self.world.set_coupling(Some(DampedSpring::new(
            spring.rest_length(),
            spring.stiffness(),
            spring.damping(),
        )));

        debug!(
            old = old.mass().get(),
            new = mass.get(),
            moment = self.world.body().moment(),
            "mass body replaced"
        );
        self.reset();
    }

    /// Changes the damping coefficient in place without restarting.
    pub fn set_damping(&mut self, damping: f64) {
        if let Some(spring) = self.world.coupling_mut() {
            spring.set_damping(damping);
        }
    }

    /// Release offset below equilibrium.
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Seconds simulated since the last reset or resize.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The spring coupling.
    pub fn spring(&self) -> DampedSpring {
        self.world.coupling().copied().unwrap_or(DEFAULT_SPRING)
    }

    /// The hanging mass.
    pub const fn body(&self) -> &DynamicBody {
        self.world.body()
    }

    /// The underlying world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The spring attachment point on the ceiling.
    pub const fn anchor(&self) -> Vec2 {
        self.world.anchor().pivot
    }

    /// Height at which the spring is at rest length.
    pub fn equilibrium_y(&self) -> f64 {
        self.anchor().y + self.spring().rest_length()
    }

    /// Current telemetry values.
    pub fn telemetry(&self) -> HarmonicTelemetry {
        let spring = self.spring();
        let body = self.world.body();
        let frequency = natural_frequency(spring.stiffness(), body.mass().get());

        HarmonicTelemetry {
            frequency,
            period: period(frequency),
            displacement: body.position().y - self.equilibrium_y(),
            velocity: body.velocity().y,
            stiffness: spring.stiffness(),
            mass: body.mass().get(),
        }
    }

    /// Kinetic plus elastic energy.
    pub fn energy(&self) -> f64 {
        let body = self.world.body();
        body.kinetic_energy() + self.spring().potential_energy(self.anchor(), body.position())
    }

    /// Closed-form displacement after [`elapsed`](Self::elapsed) seconds for
    /// the current `k`, `m`, `c` and amplitude, released from rest.
    pub fn analytic_displacement(&self) -> f64 {
        let spring = self.spring();
        let coefficients = SpringCoefficients::for_oscillator(
            self.elapsed,
            spring.stiffness(),
            self.world.body().mass().get(),
            spring.damping(),
        );
        coefficients.update(self.amplitude, 0.0, 0.0).0
    }

    fn release_position(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.world.dimensions().width() / 2),
            self.equilibrium_y() + self.amplitude,
        )
    }
}

impl Default for HarmonicMotionSim {
    fn default() -> Self {
        Self::new(Dimensions::new_unchecked(800, 600))
    }
}

impl Simulation for HarmonicMotionSim {
    fn name(&self) -> &'static str {
        "harmonic"
    }

    fn step(&mut self, dt: f64) {
        self.world.step(dt);
        self.elapsed += dt;
    }

    fn draw(&mut self) -> &Frame {
        let width = self.world.dimensions().width();
        let anchor = self.anchor();
        let center = self.world.body().position();
        let coil = spring_zigzag(anchor, center, SPRING_COILS, COIL_WIDTH);
        let lines = self.telemetry().lines();

        self.frame.clear(BG_COLOR);
        let canvas = self.frame.canvas_mut();
        canvas.line(
            Vec2::new(0.0, anchor.y),
            Vec2::new(f64::from(width), anchor.y),
            5,
            CEILING_COLOR,
        );
        canvas.polyline(&coil, 3, SPRING_COLOR);
        canvas.fill_circle(center, MASS_RADIUS, MASS_COLOR);
        canvas.circle_outline(center, MASS_RADIUS, 2, Rgb::BLACK);

        let right = i32::try_from(width).unwrap_or(i32::MAX) - 200;
        let positions = [(10, 10), (10, 35), (10, 60), (10, 85), (right, 10), (right, 35)];
        for (line, (x, y)) in lines.into_iter().zip(positions) {
            self.frame.label(x, y, line);
        }
        &self.frame
    }

    fn reset(&mut self) {
        let release = self.release_position();
        let body = self.world.body_mut();
        body.set_position(release);
        body.set_velocity(Vec2::zero());
        self.elapsed = 0.0;
        debug!(x = release.x, y = release.y, "harmonic sim reset");
    }

    fn resize(&mut self, dimensions: Dimensions) {
        self.world.set_dimensions(dimensions);
        self.world.set_anchor(ceiling_anchor(dimensions));
        self.frame = Frame::new(dimensions);

        let release = self.release_position();
        let body = self.world.body_mut();
        body.set_position(release);
        body.set_velocity(Vec2::zero());
        self.elapsed = 0.0;

        debug!(
            width = dimensions.width(),
            height = dimensions.height(),
            "harmonic sim resized"
        );
    }

    fn dimensions(&self) -> Dimensions {
        self.world.dimensions()
    }

    fn telemetry_lines(&self) -> Vec<String> {
        self.telemetry().lines()
    }
}

/// Zig-zag approximation of a coil spring from `start` to `end`.
///
/// Returns `coils + 2` points: the endpoints plus one point per coil at the
/// middle of its slice, pushed alternately `width` pixels to either side.
pub fn spring_zigzag(start: Vec2, end: Vec2, coils: usize, width: f64) -> Vec<Vec2> {
    let span = end - start;
    let axis = if span.magnitude() > 0.0 {
        span.normalized()
    } else {
        Vec2::new(0.0, 1.0)
    };
    let side = axis.perp();

    let mut points = Vec::with_capacity(coils + 2);
    points.push(start);
    for i in 0..coils {
        let t = (i as f64 + 0.5) / coils as f64;
        let offset = if i % 2 == 0 { width } else { -width };
        points.push(start + span * t + side * offset);
    }
    points.push(end);
    points
}

fn ceiling_anchor(dimensions: Dimensions) -> StaticAnchor {
    let width = f64::from(dimensions.width());
    let pivot = Vec2::new(f64::from(dimensions.width() / 2), ANCHOR_Y);
    StaticAnchor::new(
        pivot,
        Segment::horizontal(pivot.x - width / 2.0, pivot.x + width / 2.0, ANCHOR_Y, ANCHOR_RADIUS),
    )
}
