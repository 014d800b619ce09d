//! Validation errors for simulation inputs.
//!
//! Simulation operations themselves never fail. The only fallible calls are
//! the constructors of the value types that keep illegal states out of the
//! simulations: [`Mass`](crate::Mass) and [`Dimensions`](crate::Dimensions).

use thiserror::Error;

/// Error returned when a physical quantity cannot be represented.
///
/// # Example
///
/// ```rust
/// use physim::{Mass, PhysicsError};
///
/// assert!(matches!(Mass::new(0.0), Err(PhysicsError::NonPositiveMass(_))));
/// assert!(Mass::new(1.5).is_ok());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be strictly positive so inertia and acceleration stay finite.
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    /// A quantity was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending quantity.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A world or canvas with zero area.
    #[error("dimensions must be non-zero, got {width}x{height}")]
    EmptyCanvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A world or canvas with a side longer than [`MAX_SIDE`](crate::MAX_SIDE).
    #[error("dimensions must be at most {max} per side, got {width}x{height}", max = crate::MAX_SIDE)]
    CanvasTooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// A specialized [`Result`] type for physim validation.
pub type Result<T> = std::result::Result<T, PhysicsError>;
