//! Straight-line motion: a box pushed along a floor.
//!
//! The box is driven by a caller-controlled acceleration. The world edges
//! are hard walls: crossing one puts the box back flush against it and kills
//! its horizontal velocity. There is no bounce.

use tracing::{debug, trace};

use crate::body::{DynamicBody, Mass, Shape};
use crate::raster::{Frame, Rgb};
use crate::sim::{Dimensions, Simulation};
use crate::vector::Vec2;
use crate::world::{Segment, StaticAnchor, World};

/// Distance from the bottom of the world to the floor line.
const FLOOR_OFFSET: f64 = 60.0;
/// Half thickness of the floor segment; the box rests this far above it.
const FLOOR_RADIUS: f64 = 5.0;

const BOX_WIDTH: f64 = 60.0;
const BOX_HEIGHT: f64 = 40.0;
const BOX_MASS: Mass = Mass::new_unchecked(2.0);

/// Arrow shaft pixels per m/s².
const ARROW_SCALE: f64 = 3.0;
const ARROW_HEAD: f64 = 8.0;

const BG_COLOR: Rgb = Rgb::WHITE;
const BOX_COLOR: Rgb = Rgb::new(55, 65, 81);
const FLOOR_COLOR: Rgb = Rgb::new(209, 213, 219);
const ARROW_COLOR: Rgb = Rgb::new(220, 38, 38);

/// Numbers shown by [`LinearMotionSim::draw`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinearTelemetry {
    /// Commanded acceleration in m/s².
    pub acceleration: f64,
    /// Horizontal velocity.
    pub velocity: f64,
    /// Horizontal position of the box centre.
    pub position: f64,
}

impl LinearTelemetry {
    /// The three overlay lines, formatted to two decimals.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Acceleration (m/s²): {:.2}", self.acceleration),
            format!("Velocity (m/s): {:.2}", self.velocity),
            format!("Position (m): {:.2}", self.position),
        ]
    }
}

/// A 60×40 box of mass 2 on a floor, pushed by a settable acceleration.
///
/// # Example
///
/// ```rust
/// use physim::{Dimensions, LinearMotionSim, Simulation};
///
/// let mut sim = LinearMotionSim::new(Dimensions::new(800, 400)?);
/// assert_eq!(sim.telemetry().position, 200.0);
///
/// sim.set_acceleration(-50.0);
/// for _ in 0..600 {
///     sim.tick();
/// }
///
/// // Pinned against the left wall
/// assert_eq!(sim.telemetry().position, 30.0);
/// assert_eq!(sim.telemetry().velocity, 0.0);
/// # Ok::<(), physim::PhysicsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LinearMotionSim {
    world: World,
    frame: Frame,
    floor_y: f64,
    initial_position: Vec2,
    acceleration: f64,
}

impl LinearMotionSim {
    /// Creates the simulation with the box resting at a quarter of the width.
    pub fn new(dimensions: Dimensions) -> Self {
        let floor_y = floor_y(dimensions);
        let body = DynamicBody::new(
            BOX_MASS,
            Shape::Box {
                width: BOX_WIDTH,
                height: BOX_HEIGHT,
            },
        );

        let mut sim = Self {
            world: World::new(dimensions, floor_anchor(dimensions, floor_y), body),
            frame: Frame::new(dimensions),
            floor_y,
            initial_position: initial_position(dimensions, floor_y),
            acceleration: 0.0,
        };
        sim.reset();
        sim
    }

    /// Sets the driving acceleration in m/s².
    ///
    /// The value is stored as given; keeping it in a sensible range is the
    /// caller's job (see [`controls::ACCELERATION`](crate::controls::ACCELERATION)).
    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.acceleration = acceleration;
    }

    /// The driving acceleration in m/s².
    pub const fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Current telemetry values.
    pub fn telemetry(&self) -> LinearTelemetry {
        let body = self.world.body();
        LinearTelemetry {
            acceleration: self.acceleration,
            velocity: body.velocity().x,
            position: body.position().x,
        }
    }

    /// The box.
    pub const fn body(&self) -> &DynamicBody {
        self.world.body()
    }

    /// The underlying world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Height of the floor line.
    pub const fn floor_y(&self) -> f64 {
        self.floor_y
    }

    /// Where [`reset`](Simulation::reset) puts the box.
    pub const fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    /// Half the box width.
    pub const fn half_width() -> f64 {
        BOX_WIDTH / 2.0
    }

    fn clamp_to_walls(&mut self) {
        let half_width = Self::half_width();
        let width = f64::from(self.world.dimensions().width());
        let body = self.world.body_mut();
        let pos = body.position();

        if pos.x - half_width < 0.0 {
            body.set_position(Vec2::new(half_width, pos.y));
            body.set_velocity(Vec2::new(0.0, body.velocity().y));
            trace!(x = half_width, "box clamped at left wall");
        }

        if pos.x + half_width > width {
            body.set_position(Vec2::new(width - half_width, pos.y));
            body.set_velocity(Vec2::new(0.0, body.velocity().y));
            trace!(x = width - half_width, "box clamped at right wall");
        }
    }

    fn draw_arrow(&mut self) {
        let start = self.world.body().position();
        let length = self.acceleration * ARROW_SCALE;
        let end = start + Vec2::new(length, 0.0);

        // Head points the same way as the shaft
        let back = if length > 0.0 { -ARROW_HEAD } else { ARROW_HEAD };
        let upper = end + Vec2::new(back, -ARROW_HEAD);
        let lower = end + Vec2::new(back, ARROW_HEAD);

        let canvas = self.frame.canvas_mut();
        canvas.line(start, end, 3, ARROW_COLOR);
        canvas.line(end, upper, 3, ARROW_COLOR);
        canvas.line(end, lower, 3, ARROW_COLOR);
    }
}

impl Default for LinearMotionSim {
    fn default() -> Self {
        Self::new(Dimensions::new_unchecked(800, 400))
    }
}

impl Simulation for LinearMotionSim {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn step(&mut self, dt: f64) {
        let mass = self.world.body().mass().get();
        self.world
            .body_mut()
            .set_force(Vec2::new(mass * self.acceleration, 0.0));
        self.world.step(dt);
        self.clamp_to_walls();
    }

    fn draw(&mut self) -> &Frame {
        let width = f64::from(self.world.dimensions().width());
        let outline = self.world.body().outline();

        self.frame.clear(BG_COLOR);
        let canvas = self.frame.canvas_mut();
        canvas.line(
            Vec2::new(0.0, self.floor_y),
            Vec2::new(width, self.floor_y),
            6,
            FLOOR_COLOR,
        );
        canvas.fill_polygon(&outline, BOX_COLOR);

        if self.acceleration != 0.0 {
            self.draw_arrow();
        }

        for (line, y) in self.telemetry().lines().into_iter().zip([10, 35, 60]) {
            self.frame.label(10, y, line);
        }
        &self.frame
    }

    fn reset(&mut self) {
        self.acceleration = 0.0;
        let body = self.world.body_mut();
        body.set_position(self.initial_position);
        body.halt();
        debug!(x = self.initial_position.x, y = self.initial_position.y, "linear sim reset");
    }

    fn resize(&mut self, dimensions: Dimensions) {
        let floor_y = floor_y(dimensions);
        let width = f64::from(dimensions.width());
        let half_width = Self::half_width();

        self.world.set_dimensions(dimensions);
        self.world.set_anchor(floor_anchor(dimensions, floor_y));
        self.frame = Frame::new(dimensions);
        self.floor_y = floor_y;
        self.initial_position = initial_position(dimensions, floor_y);

        // Stay within the new walls, resting on the (possibly moved) floor
        let body = self.world.body_mut();
        let x = body.position().x.min(width - half_width).max(half_width);
        body.set_position(Vec2::new(x, resting_y(floor_y)));

        debug!(
            width = dimensions.width(),
            height = dimensions.height(),
            x,
            "linear sim resized"
        );
    }

    fn dimensions(&self) -> Dimensions {
        self.world.dimensions()
    }

    fn telemetry_lines(&self) -> Vec<String> {
        self.telemetry().lines()
    }
}

fn floor_y(dimensions: Dimensions) -> f64 {
    f64::from(dimensions.height()) - FLOOR_OFFSET
}

fn resting_y(floor_y: f64) -> f64 {
    floor_y - BOX_HEIGHT / 2.0 - FLOOR_RADIUS
}

fn initial_position(dimensions: Dimensions, floor_y: f64) -> Vec2 {
    Vec2::new(f64::from(dimensions.width() / 4), resting_y(floor_y))
}

fn floor_anchor(dimensions: Dimensions, floor_y: f64) -> StaticAnchor {
    let width = f64::from(dimensions.width());
    StaticAnchor::new(
        Vec2::new(width / 2.0, floor_y),
        Segment::horizontal(0.0, width, floor_y, FLOOR_RADIUS),
    )
}
