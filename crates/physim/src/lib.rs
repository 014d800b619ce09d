#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::struct_field_names)]

//! # Physim
//!
//! Fixed-timestep point-mass simulations for interactive physics demos.
//!
//! Physim provides:
//! - **LinearMotionSim**: a box sliding along a floor under a controlled
//!   acceleration, stopped dead by the world edges
//! - **HarmonicMotionSim**: a mass hanging from a ceiling on a damped spring
//!
//! Both share one lifecycle, the [`Simulation`] trait: construct with
//! [`Dimensions`], set parameters, [`step`](Simulation::step) once per frame,
//! [`draw`](Simulation::draw) into an off-screen [`Canvas`], and
//! [`reset`](Simulation::reset) or [`resize`](Simulation::resize) on demand.
//!
//! ## Linear Example
//!
//! ```rust
//! use physim::{Dimensions, LinearMotionSim, Simulation, fps};
//!
//! let mut sim = LinearMotionSim::new(Dimensions::new(800, 400)?);
//! sim.set_acceleration(10.0);
//!
//! // One second at 60 FPS
//! for _ in 0..60 {
//!     sim.step(fps(60));
//! }
//!
//! assert!((sim.telemetry().velocity - 10.0).abs() < 1e-9);
//! # Ok::<(), physim::PhysicsError>(())
//! ```
//!
//! ## Harmonic Example
//!
//! ```rust
//! use physim::{Dimensions, HarmonicMotionSim, Mass, Simulation};
//!
//! let mut sim = HarmonicMotionSim::new(Dimensions::new(800, 600)?);
//! sim.set_stiffness(200.0);
//! sim.set_mass(Mass::new(0.1)?);
//!
//! let telemetry = sim.telemetry();
//! assert!((telemetry.frequency - 7.12).abs() < 0.01);
//!
//! let frame = sim.draw();
//! assert_eq!(frame.labels().len(), 6);
//! # Ok::<(), physim::PhysicsError>(())
//! ```
//!
//! ## Integration
//!
//! Every body advances with semi-implicit Euler: velocity first from the
//! accumulated force, then position from the new velocity. The spring
//! coupling adds `-k·(length - rest) - c·v` along the anchor-body axis.

mod body;
pub mod controls;
mod error;
mod harmonic;
mod linear;
mod raster;
mod sim;
mod spring;
mod vector;
mod world;

pub use body::{DynamicBody, Mass, Shape, moment_for_box, moment_for_circle};
pub use error::{PhysicsError, Result};
pub use harmonic::{HarmonicMotionSim, HarmonicTelemetry, spring_zigzag};
pub use linear::{LinearMotionSim, LinearTelemetry};
pub use raster::{Canvas, Frame, Label, Rgb, SnapshotFormat};
pub use sim::{DEFAULT_DT, Dimensions, MAX_SIDE, Simulation, TICK_RATE};
pub use spring::{DampedSpring, SpringCoefficients, fps, natural_frequency, period};
pub use vector::Vec2;
pub use world::{Segment, StaticAnchor, World};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::body::{DynamicBody, Mass, Shape};
    pub use crate::harmonic::{HarmonicMotionSim, HarmonicTelemetry};
    pub use crate::linear::{LinearMotionSim, LinearTelemetry};
    pub use crate::raster::{Canvas, Frame};
    pub use crate::sim::{DEFAULT_DT, Dimensions, Simulation, TICK_RATE};
    pub use crate::spring::fps;
    pub use crate::vector::Vec2;
}
