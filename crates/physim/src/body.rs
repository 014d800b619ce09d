//! The dynamic point mass moved by the integrator.
//!
//! A [`DynamicBody`] carries linear and angular state, a force accumulator and
//! a moment of inertia derived from its [`Mass`] and [`Shape`] at creation.
//! Changing the mass goes through [`DynamicBody::with_mass`], which builds a
//! replacement body so inertia is never computed from a stale mass.

use crate::error::{PhysicsError, Result};
use crate::vector::Vec2;

/// Strictly positive, finite mass in kilograms.
///
/// # Example
///
/// ```rust
/// use physim::Mass;
///
/// let m = Mass::new(2.0)?;
/// assert_eq!(m.get(), 2.0);
/// assert!(Mass::new(-1.0).is_err());
/// assert!(Mass::new(f64::NAN).is_err());
/// # Ok::<(), physim::PhysicsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mass(f64);

impl Mass {
    /// One kilogram.
    pub const ONE: Mass = Mass(1.0);

    /// Validates and wraps a mass value.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFinite`] for NaN or infinite input and
    /// [`PhysicsError::NonPositiveMass`] for zero or negative input.
    pub fn new(kg: f64) -> Result<Self> {
        if !kg.is_finite() {
            return Err(PhysicsError::NonFinite {
                name: "mass",
                value: kg,
            });
        }
        if kg <= 0.0 {
            return Err(PhysicsError::NonPositiveMass(kg));
        }
        Ok(Self(kg))
    }

    /// For compile-time defaults only; `kg` must be positive and finite.
    pub(crate) const fn new_unchecked(kg: f64) -> Self {
        Self(kg)
    }

    /// The mass in kilograms.
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for Mass {
    type Error = PhysicsError;

    fn try_from(kg: f64) -> Result<Self> {
        Self::new(kg)
    }
}

/// Moment of inertia of a solid box centred on its body.
#[inline]
pub fn moment_for_box(mass: f64, width: f64, height: f64) -> f64 {
    mass * (width * width + height * height) / 12.0
}

/// Moment of inertia of a ring (or disc when `inner` is zero) centred on its body.
#[inline]
pub fn moment_for_circle(mass: f64, inner: f64, outer: f64) -> f64 {
    mass * (inner * inner + outer * outer) / 2.0
}

/// Collision outline attached to a body. Only used for drawing, bounds and inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned (before rotation) box with full extents.
    Box {
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
    },
    /// Solid disc.
    Circle {
        /// Radius.
        radius: f64,
    },
}

impl Shape {
    /// Moment of inertia of this shape for `mass`.
    pub fn moment(&self, mass: Mass) -> f64 {
        match *self {
            Shape::Box { width, height } => moment_for_box(mass.get(), width, height),
            Shape::Circle { radius } => moment_for_circle(mass.get(), 0.0, radius),
        }
    }

    /// Half extents of the shape's bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Box { width, height } => Vec2::new(width / 2.0, height / 2.0),
            Shape::Circle { radius } => Vec2::new(radius, radius),
        }
    }

    /// Polygon vertices relative to the body centre, clockwise on screen.
    /// Circles have none.
    pub fn vertices(&self) -> Vec<Vec2> {
        match *self {
            Shape::Box { .. } => {
                let h = self.half_extents();
                vec![
                    Vec2::new(-h.x, -h.y),
                    Vec2::new(h.x, -h.y),
                    Vec2::new(h.x, h.y),
                    Vec2::new(-h.x, h.y),
                ]
            }
            Shape::Circle { .. } => Vec::new(),
        }
    }
}

/// A mass-bearing body advanced by semi-implicit Euler.
///
/// # Example
///
/// ```rust
/// use physim::{DynamicBody, Mass, Shape, Vec2};
///
/// let mut body = DynamicBody::new(Mass::new(2.0)?, Shape::Box { width: 60.0, height: 40.0 });
/// body.set_force(Vec2::new(20.0, 0.0));
/// body.integrate(0.5);
///
/// // a = F/m = 10, v = a·dt = 5, x = v·dt = 2.5
/// assert_eq!(body.velocity(), Vec2::new(5.0, 0.0));
/// assert_eq!(body.position(), Vec2::new(2.5, 0.0));
/// // The force accumulator is consumed by each step
/// assert_eq!(body.force(), Vec2::zero());
/// # Ok::<(), physim::PhysicsError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBody {
    position: Vec2,
    velocity: Vec2,
    force: Vec2,
    angle: f64,
    angular_velocity: f64,
    torque: f64,
    mass: Mass,
    moment: f64,
    shape: Shape,
}

impl DynamicBody {
    /// Creates a body at rest at the origin.
    pub fn new(mass: Mass, shape: Shape) -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            force: Vec2::zero(),
            angle: 0.0,
            angular_velocity: 0.0,
            torque: 0.0,
            mass,
            moment: shape.moment(mass),
            shape,
        }
    }

    /// Builds the replacement body for a mass change.
    ///
    /// Inertia is recomputed from `mass`; position, velocity and rotation
    /// carry over from `self`. Pending force and torque do not.
    pub fn with_mass(&self, mass: Mass) -> Self {
        Self {
            position: self.position,
            velocity: self.velocity,
            angle: self.angle,
            angular_velocity: self.angular_velocity,
            ..Self::new(mass, self.shape)
        }
    }

    /// Advances the body by `dt` seconds and clears the accumulators.
    ///
    /// Velocity is updated from the accumulated force first, then position
    /// from the updated velocity.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.force / self.mass.get() * dt;
        self.angular_velocity += self.torque / self.moment * dt;

        self.position += self.velocity * dt;
        self.angle += self.angular_velocity * dt;

        self.force = Vec2::zero();
        self.torque = 0.0;
    }

    /// Stops all motion and discards pending forces. Position is kept.
    pub fn halt(&mut self) {
        self.velocity = Vec2::zero();
        self.force = Vec2::zero();
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.torque = 0.0;
    }

    /// Adds `force` to the accumulator for the next step.
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Replaces the accumulated force for the next step.
    #[inline]
    pub fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    /// Kinetic energy of the translational motion.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass.get() * self.velocity.dot(self.velocity)
    }

    /// World-space outline of a box body, rotated by the body angle.
    pub fn outline(&self) -> Vec<Vec2> {
        self.shape
            .vertices()
            .into_iter()
            .map(|v| self.position + v.rotated(self.angle))
            .collect()
    }

    /// Current position.
    #[inline]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[inline]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Force accumulated for the next step.
    #[inline]
    pub const fn force(&self) -> Vec2 {
        self.force
    }

    /// Rotation in radians.
    #[inline]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Angular velocity in radians per second.
    #[inline]
    pub const fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// The body's mass.
    #[inline]
    pub const fn mass(&self) -> Mass {
        self.mass
    }

    /// Moment of inertia, fixed at creation from mass and shape.
    #[inline]
    pub const fn moment(&self) -> f64 {
        self.moment
    }

    /// The attached shape.
    #[inline]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Sets the position.
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Sets the velocity.
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}
