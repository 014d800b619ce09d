//! The single-body physics world.
//!
//! A [`World`] owns one static anchor, exactly one [`DynamicBody`] and an
//! optional [`DampedSpring`] joining them. There is no gravity; every
//! force comes from the body's accumulator or the spring.

use tracing::trace;

use crate::body::DynamicBody;
use crate::sim::Dimensions;
use crate::spring::DampedSpring;
use crate::vector::Vec2;

/// A thick line segment in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
    /// Half thickness.
    pub radius: f64,
}

impl Segment {
    /// Creates a segment.
    pub const fn new(start: Vec2, end: Vec2, radius: f64) -> Self {
        Self { start, end, radius }
    }

    /// Horizontal segment at height `y` spanning `x0..=x1`.
    pub const fn horizontal(x0: f64, x1: f64, y: f64, radius: f64) -> Self {
        Self::new(Vec2::new(x0, y), Vec2::new(x1, y), radius)
    }
}

/// Immovable reference geometry: a floor or a ceiling.
///
/// `pivot` is the point a spring attaches to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticAnchor {
    /// Spring attachment point.
    pub pivot: Vec2,
    /// Collision outline.
    pub segment: Segment,
}

impl StaticAnchor {
    /// Creates an anchor.
    pub const fn new(pivot: Vec2, segment: Segment) -> Self {
        Self { pivot, segment }
    }
}

/// A world holding one anchor and one dynamic body.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    dimensions: Dimensions,
    anchor: StaticAnchor,
    body: DynamicBody,
    coupling: Option<DampedSpring>,
}

impl World {
    /// Creates a world without spring coupling.
    pub fn new(dimensions: Dimensions, anchor: StaticAnchor, body: DynamicBody) -> Self {
        Self {
            dimensions,
            anchor,
            body,
            coupling: None,
        }
    }

    /// Attaches a spring between the anchor pivot and the body.
    pub fn with_coupling(mut self, spring: DampedSpring) -> Self {
        self.coupling = Some(spring);
        self
    }

    /// Advances the world by `dt` seconds.
    ///
    /// Forces already applied to the body are combined with the spring
    /// force, then the body is integrated.
    pub fn step(&mut self, dt: f64) {
        if let Some(spring) = &self.coupling {
            let pull = spring.force(self.anchor.pivot, self.body.position(), self.body.velocity());
            self.body.apply_force(pull);
        }

        trace!(force.x = self.body.force().x, force.y = self.body.force().y, dt, "world step");
        self.body.integrate(dt);
    }

    /// Swaps in a new body and returns the old one.
    pub fn replace_body(&mut self, body: DynamicBody) -> DynamicBody {
        std::mem::replace(&mut self.body, body)
    }

    /// Replaces (or removes) the spring coupling.
    pub fn set_coupling(&mut self, coupling: Option<DampedSpring>) {
        self.coupling = coupling;
    }

    /// Replaces the static anchor.
    pub fn set_anchor(&mut self, anchor: StaticAnchor) {
        self.anchor = anchor;
    }

    /// Updates the stored dimensions.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    /// World dimensions.
    #[inline]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The static anchor.
    #[inline]
    pub const fn anchor(&self) -> &StaticAnchor {
        &self.anchor
    }

    /// The dynamic body.
    #[inline]
    pub const fn body(&self) -> &DynamicBody {
        &self.body
    }

    /// Mutable access to the dynamic body.
    #[inline]
    pub fn body_mut(&mut self) -> &mut DynamicBody {
        &mut self.body
    }

    /// The spring coupling, if any.
    #[inline]
    pub const fn coupling(&self) -> Option<&DampedSpring> {
        self.coupling.as_ref()
    }

    /// Mutable access to the spring coupling, if any.
    #[inline]
    pub fn coupling_mut(&mut self) -> Option<&mut DampedSpring> {
        self.coupling.as_mut()
    }
}
