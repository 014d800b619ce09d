//! The lifecycle shared by every simulation.
//!
//! A caller owns the clock. Each tick it calls [`Simulation::step`] with a
//! fixed time delta, then [`Simulation::draw`], then presents the returned
//! [`Frame`]. Parameter changes, [`Simulation::reset`] and
//! [`Simulation::resize`] happen between ticks on the same thread.

use crate::error::{PhysicsError, Result};
use crate::raster::Frame;

/// Display rate the simulations are tuned for.
pub const TICK_RATE: u32 = 60;

/// Time delta of one tick at [`TICK_RATE`].
pub const DEFAULT_DT: f64 = 1.0 / TICK_RATE as f64;

/// Longest side a world or canvas may have, in pixels.
pub const MAX_SIDE: u32 = 16_384;

/// Width and height of a simulation world, in pixels.
///
/// Both sides lie in `1..=MAX_SIDE`, so every `Dimensions` fits a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Validates a width/height pair.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::EmptyCanvas`] when either side is zero and
    /// [`PhysicsError::CanvasTooLarge`] when either exceeds [`MAX_SIDE`].
    pub const fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PhysicsError::EmptyCanvas { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(PhysicsError::CanvasTooLarge { width, height });
        }
        Ok(Self { width, height })
    }

    /// For compile-time defaults only; both sides must be in `1..=MAX_SIDE`.
    pub(crate) const fn new_unchecked(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A single-entity simulation driven by an external fixed-rate clock.
///
/// Implementations are single-threaded; none of the operations fail.
///
/// # Example
///
/// ```rust
/// use physim::{Dimensions, HarmonicMotionSim, LinearMotionSim, Simulation};
///
/// let size = Dimensions::new(640, 320)?;
/// let mut sims: Vec<Box<dyn Simulation>> = vec![
///     Box::new(LinearMotionSim::new(size)),
///     Box::new(HarmonicMotionSim::new(size)),
/// ];
///
/// for sim in &mut sims {
///     sim.tick();
///     let frame = sim.draw();
///     assert_eq!(frame.canvas().width(), 640);
/// }
/// # Ok::<(), physim::PhysicsError>(())
/// ```
pub trait Simulation {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f64);

    /// Advances by one tick at the default rate.
    fn tick(&mut self) {
        self.step(DEFAULT_DT);
    }

    /// Renders the current state into the off-screen frame and returns it.
    fn draw(&mut self) -> &Frame;

    /// Returns the simulation to its initial state.
    fn reset(&mut self);

    /// Adapts the world, the frame buffer and the body to new dimensions.
    fn resize(&mut self, dimensions: Dimensions);

    /// Current world dimensions.
    fn dimensions(&self) -> Dimensions;

    /// The text lines `draw` prints, formatted from current state.
    fn telemetry_lines(&self) -> Vec<String>;
}
