//! Damped spring coupling and its closed-form reference solution.
//!
//! [`DampedSpring`] is the force link the integrator applies between a static
//! anchor and the dynamic body. [`SpringCoefficients`] solves the same
//! oscillator analytically and is used to cross-check the numerical result.
//!
//! The closed-form coefficients follow Ryan Juckett's damped harmonic motion
//! derivation:
//! <https://www.ryanjuckett.com/damped-springs/>

use core::f64::consts::TAU;

use crate::vector::Vec2;

/// Machine epsilon for floating point comparisons.
const EPSILON: f64 = f64::EPSILON;

/// Returns a time delta for a given number of frames per second.
///
/// # Example
///
/// ```rust
/// use physim::fps;
///
/// assert_eq!(fps(60), 1.0 / 60.0);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / n as f64
}

/// Natural frequency in hertz of a mass `m` on a spring of stiffness `k`.
///
/// Returns `0.0` when the mass is not positive or the stiffness is negative
/// instead of dividing by zero or taking the root of a negative number.
///
/// ```rust
/// use physim::natural_frequency;
///
/// assert!((natural_frequency(50.0, 1.0) - 1.125).abs() < 1e-3);
/// assert_eq!(natural_frequency(50.0, 0.0), 0.0);
/// ```
pub fn natural_frequency(k: f64, m: f64) -> f64 {
    if m > 0.0 && k >= 0.0 {
        (k / m).sqrt() / TAU
    } else {
        0.0
    }
}

/// Period in seconds for a frequency in hertz; infinite when the frequency is not positive.
pub fn period(frequency: f64) -> f64 {
    if frequency > 0.0 {
        1.0 / frequency
    } else {
        f64::INFINITY
    }
}

/// A damped linear link between a fixed anchor point and a body.
///
/// The force on the body is `-k·(length - rest_length) - c·v_n` along the
/// anchor-to-body axis, where `v_n` is the body velocity projected on that
/// axis.
///
/// # Example
///
/// ```rust
/// use physim::{DampedSpring, Vec2};
///
/// let spring = DampedSpring::new(150.0, 50.0, 0.0);
/// // Stretched 100 past rest straight below the anchor: pulled back up
/// let f = spring.force(Vec2::new(0.0, 0.0), Vec2::new(0.0, 250.0), Vec2::zero());
/// assert_eq!(f, Vec2::new(0.0, -5000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedSpring {
    rest_length: f64,
    stiffness: f64,
    damping: f64,
}

impl DampedSpring {
    /// Creates a spring with the given rest length, stiffness `k` and damping `c`.
    pub const fn new(rest_length: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            rest_length,
            stiffness,
            damping,
        }
    }

    /// Force exerted on a body at `position` moving with `velocity`.
    ///
    /// When the body sits exactly on the anchor the axis defaults to
    /// straight down.
    pub fn force(&self, anchor: Vec2, position: Vec2, velocity: Vec2) -> Vec2 {
        let delta = position - anchor;
        let length = delta.magnitude();
        let axis = if length > 0.0 {
            delta / length
        } else {
            Vec2::new(0.0, 1.0)
        };

        let spring = -self.stiffness * (length - self.rest_length);
        let damper = -self.damping * velocity.dot(axis);
        axis * (spring + damper)
    }

    /// Elastic energy stored for a body at `position`.
    pub fn potential_energy(&self, anchor: Vec2, position: Vec2) -> f64 {
        let stretch = (position - anchor).magnitude() - self.rest_length;
        0.5 * self.stiffness * stretch * stretch
    }

    /// Rest length.
    #[inline]
    pub const fn rest_length(&self) -> f64 {
        self.rest_length
    }

    /// Stiffness `k`.
    #[inline]
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping coefficient `c`.
    #[inline]
    pub const fn damping(&self) -> f64 {
        self.damping
    }

    /// Changes the stiffness in place.
    #[inline]
    pub fn set_stiffness(&mut self, stiffness: f64) {
        self.stiffness = stiffness;
    }

    /// Changes the damping coefficient in place.
    #[inline]
    pub fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }
}

/// Precomputed closed-form motion of a damped harmonic oscillator.
///
/// Maps a `(position, velocity)` pair relative to equilibrium to the pair
/// `delta_time` seconds later. Coefficients depend only on the time step,
/// angular frequency and damping ratio.
///
/// # Damping Ratios
///
/// - **Over-damped (ζ > 1)**: No oscillation, slow approach to equilibrium
/// - **Critically-damped (ζ = 1)**: Fastest approach without oscillation
/// - **Under-damped (ζ < 1)**: Oscillates around equilibrium with decay
///
/// # Example
///
/// ```rust
/// use physim::SpringCoefficients;
///
/// // Undamped, half a period later the mass is on the other side
/// let omega = 2.0 * std::f64::consts::PI;
/// let half = SpringCoefficients::new(0.5, omega, 0.0);
/// let (pos, _vel) = half.update(100.0, 0.0, 0.0);
/// assert!((pos + 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringCoefficients {
    pos_pos_coef: f64,
    pos_vel_coef: f64,
    vel_pos_coef: f64,
    vel_vel_coef: f64,
}

impl SpringCoefficients {
    /// Computes coefficients for advancing `delta_time` seconds.
    ///
    /// Negative angular frequency and damping ratio are clamped to zero.
    /// Zero angular frequency yields the identity map.
    pub fn new(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let angular_frequency = angular_frequency.max(0.0);
        let damping_ratio = damping_ratio.max(0.0);

        // If there is no angular frequency, the spring will not move
        if angular_frequency < EPSILON {
            return Self {
                pos_pos_coef: 1.0,
                pos_vel_coef: 0.0,
                vel_pos_coef: 0.0,
                vel_vel_coef: 1.0,
            };
        }

        if damping_ratio > 1.0 + EPSILON {
            Self::over_damped(delta_time, angular_frequency, damping_ratio)
        } else if damping_ratio < 1.0 - EPSILON {
            Self::under_damped(delta_time, angular_frequency, damping_ratio)
        } else {
            Self::critically_damped(delta_time, angular_frequency)
        }
    }

    /// Coefficients for a mass `m` on a spring with stiffness `k` and damping `c`.
    ///
    /// Uses `ω = √(k/m)` and `ζ = c / (2·√(k·m))`.
    pub fn for_oscillator(delta_time: f64, stiffness: f64, mass: f64, damping: f64) -> Self {
        if mass <= 0.0 || stiffness <= 0.0 {
            return Self::new(delta_time, 0.0, 0.0);
        }
        let angular_frequency = (stiffness / mass).sqrt();
        let damping_ratio = damping / (2.0 * (stiffness * mass).sqrt());
        Self::new(delta_time, angular_frequency, damping_ratio)
    }

    fn over_damped(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let za = -angular_frequency * damping_ratio;
        let zb = angular_frequency * (damping_ratio * damping_ratio - 1.0).sqrt();
        let z1 = za - zb;
        let z2 = za + zb;

        let e1 = (z1 * delta_time).exp();
        let e2 = (z2 * delta_time).exp();

        let inv_two_zb = 1.0 / (2.0 * zb); // = 1 / (z2 - z1)

        let e1_over_two_zb = e1 * inv_two_zb;
        let e2_over_two_zb = e2 * inv_two_zb;

        let z1e1_over_two_zb = z1 * e1_over_two_zb;
        let z2e2_over_two_zb = z2 * e2_over_two_zb;

        Self {
            pos_pos_coef: e1_over_two_zb * z2 - z2e2_over_two_zb + e2,
            pos_vel_coef: -e1_over_two_zb + e2_over_two_zb,
            vel_pos_coef: (z1e1_over_two_zb - z2e2_over_two_zb + e2) * z2,
            vel_vel_coef: -z1e1_over_two_zb + z2e2_over_two_zb,
        }
    }

    fn under_damped(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let omega_zeta = angular_frequency * damping_ratio;
        let alpha = angular_frequency * (1.0 - damping_ratio * damping_ratio).sqrt();

        let exp_term = (-omega_zeta * delta_time).exp();
        let (sin_term, cos_term) = (alpha * delta_time).sin_cos();

        let inv_alpha = 1.0 / alpha;

        let exp_sin = exp_term * sin_term;
        let exp_cos = exp_term * cos_term;
        let exp_omega_zeta_sin_over_alpha = exp_term * omega_zeta * sin_term * inv_alpha;

        Self {
            pos_pos_coef: exp_cos + exp_omega_zeta_sin_over_alpha,
            pos_vel_coef: exp_sin * inv_alpha,
            vel_pos_coef: -exp_sin * alpha - omega_zeta * exp_omega_zeta_sin_over_alpha,
            vel_vel_coef: exp_cos - exp_omega_zeta_sin_over_alpha,
        }
    }

    fn critically_damped(delta_time: f64, angular_frequency: f64) -> Self {
        let exp_term = (-angular_frequency * delta_time).exp();
        let time_exp = delta_time * exp_term;
        let time_exp_freq = time_exp * angular_frequency;

        Self {
            pos_pos_coef: time_exp_freq + exp_term,
            pos_vel_coef: time_exp,
            vel_pos_coef: -angular_frequency * time_exp_freq,
            vel_vel_coef: -time_exp_freq + exp_term,
        }
    }

    /// Advances `(pos, vel)` toward `equilibrium_pos`, returning the new pair.
    #[inline]
    pub fn update(&self, pos: f64, vel: f64, equilibrium_pos: f64) -> (f64, f64) {
        let old_pos = pos - equilibrium_pos;
        let old_vel = vel;

        let new_pos = old_pos * self.pos_pos_coef + old_vel * self.pos_vel_coef + equilibrium_pos;
        let new_vel = old_pos * self.vel_pos_coef + old_vel * self.vel_vel_coef;

        (new_pos, new_vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_fps() {
        assert!(approx_eq(fps(60), 1.0 / 60.0));
        assert!(approx_eq(fps(30), 1.0 / 30.0));
        assert!(approx_eq(fps(120), 1.0 / 120.0));
    }

    #[test]
    fn test_natural_frequency_reference_pairs() {
        assert!((natural_frequency(50.0, 1.0) - 1.125_395).abs() < 1e-5);
        assert!((natural_frequency(200.0, 0.1) - 7.117_625).abs() < 1e-5);
    }

    #[test]
    fn test_frequency_guards() {
        assert_eq!(natural_frequency(50.0, 0.0), 0.0);
        assert_eq!(natural_frequency(50.0, -1.0), 0.0);
        assert_eq!(natural_frequency(-50.0, 1.0), 0.0);
        assert_eq!(natural_frequency(0.0, 1.0), 0.0);
        assert!(period(0.0).is_infinite());
        assert!(approx_eq(period(4.0), 0.25));
    }

    #[test]
    fn test_spring_force_at_rest_length() {
        let spring = DampedSpring::new(150.0, 50.0, 1.0);
        let f = spring.force(Vec2::new(400.0, 50.0), Vec2::new(400.0, 200.0), Vec2::zero());
        assert_eq!(f, Vec2::zero());
    }

    #[test]
    fn test_spring_compressed_pushes_away() {
        let spring = DampedSpring::new(150.0, 10.0, 0.0);
        let f = spring.force(Vec2::zero(), Vec2::new(0.0, 100.0), Vec2::zero());
        assert!(approx_eq(f.y, 500.0));
        assert!(approx_eq(f.x, 0.0));
    }

    #[test]
    fn test_damping_opposes_axial_velocity() {
        let spring = DampedSpring::new(150.0, 0.0, 2.0);
        let f = spring.force(Vec2::zero(), Vec2::new(0.0, 150.0), Vec2::new(0.0, 3.0));
        assert!(approx_eq(f.y, -6.0));

        // Velocity perpendicular to the axis is not damped
        let f = spring.force(Vec2::zero(), Vec2::new(0.0, 150.0), Vec2::new(3.0, 0.0));
        assert!(approx_eq(f.x, 0.0));
        assert!(approx_eq(f.y, 0.0));
    }

    #[test]
    fn test_coincident_anchor_defaults_downward() {
        let spring = DampedSpring::new(10.0, 1.0, 0.0);
        let f = spring.force(Vec2::zero(), Vec2::zero(), Vec2::zero());
        assert_eq!(f, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_potential_energy() {
        let spring = DampedSpring::new(150.0, 50.0, 1.0);
        let e = spring.potential_energy(Vec2::zero(), Vec2::new(0.0, 250.0));
        assert!(approx_eq(e, 0.5 * 50.0 * 100.0 * 100.0));
    }

    #[test]
    fn test_identity_coefficients() {
        let c = SpringCoefficients::new(fps(60), 0.0, 0.5);
        let (pos, vel) = c.update(10.0, 5.0, 100.0);
        assert!(approx_eq(pos, 10.0));
        assert!(approx_eq(vel, 5.0));

        let c = SpringCoefficients::for_oscillator(1.0, 50.0, 0.0, 1.0);
        assert_eq!(c.update(3.0, 0.0, 0.0), (3.0, 0.0));
    }

    #[test]
    fn test_critically_damped_approaches_target() {
        let c = SpringCoefficients::new(fps(60), 5.0, 1.0);
        let mut pos = 0.0;
        let mut vel = 0.0;
        for _ in 0..300 {
            (pos, vel) = c.update(pos, vel, 100.0);
        }
        assert!((pos - 100.0).abs() < 0.01, "Expected pos ≈ 100, got {pos}");
        assert!(vel.abs() < 0.01, "Expected vel ≈ 0, got {vel}");
    }

    #[test]
    fn test_over_damped_no_oscillation() {
        let c = SpringCoefficients::new(fps(60), 5.0, 2.0);
        let mut pos = 0.0;
        let mut vel = 0.0;
        let mut max_pos: f64 = 0.0;
        for _ in 0..600 {
            (pos, vel) = c.update(pos, vel, 100.0);
            max_pos = max_pos.max(pos);
        }
        assert!(max_pos <= 100.0 + TOLERANCE, "overshot: {max_pos}");
    }

    #[test]
    fn test_for_oscillator_matches_explicit_parameters() {
        // k = 50, m = 2, c = 4: ω = 5, ζ = 4 / (2·10) = 0.2
        let a = SpringCoefficients::for_oscillator(0.1, 50.0, 2.0, 4.0);
        let b = SpringCoefficients::new(0.1, 5.0, 0.2);
        assert_eq!(a, b);
    }
}
