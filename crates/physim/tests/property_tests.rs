#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

use std::f64::consts::TAU;

use physim::{
    DEFAULT_DT, Dimensions, HarmonicMotionSim, LinearMotionSim, Mass, Simulation, fps,
    natural_frequency,
};
use proptest::prelude::*;

fn linear(width: u32, height: u32) -> LinearMotionSim {
    LinearMotionSim::new(Dimensions::new(width, height).unwrap())
}

// =============================================================================
// Linear motion: rest and accumulation
// =============================================================================

proptest! {
    #[test]
    fn linear_rest_never_moves(
        // Quarter width clears the left wall
        width in 240u32..2000,
        height in 80u32..1200,
        steps in 1usize..600,
    ) {
        let mut sim = linear(width, height);
        let start = sim.body().position();

        for _ in 0..steps {
            sim.step(DEFAULT_DT);
        }

        prop_assert_eq!(sim.body().position(), start);
        prop_assert_eq!(sim.telemetry().velocity, 0.0);
    }

    #[test]
    fn linear_velocity_follows_euler_accumulation(
        acceleration in -50.0f64..50.0,
        steps in 1usize..60,
    ) {
        // Wide world so no wall is reached within a second
        let mut sim = linear(4000, 400);
        sim.set_acceleration(acceleration);

        let mut expected_v = 0.0;
        let mut expected_x = sim.telemetry().position;
        for _ in 0..steps {
            sim.step(DEFAULT_DT);
            expected_v += acceleration * DEFAULT_DT;
            expected_x += expected_v * DEFAULT_DT;
        }

        let t = sim.telemetry();
        prop_assert_eq!(t.velocity, expected_v);
        prop_assert_eq!(t.position, expected_x);
        prop_assert!(
            (t.velocity - acceleration * DEFAULT_DT * steps as f64).abs() < 1e-9,
            "v={} a={} n={}", t.velocity, acceleration, steps
        );
    }

    #[test]
    fn linear_never_leaves_world(
        width in 60u32..1500,
        acceleration in -50.0f64..50.0,
        steps in 1usize..1200,
    ) {
        let mut sim = linear(width, 400);
        sim.set_acceleration(acceleration);
        let half = LinearMotionSim::half_width();

        for _ in 0..steps {
            sim.step(DEFAULT_DT);
            let x = sim.telemetry().position;
            prop_assert!(x - half >= 0.0, "left edge crossed: x={}", x);
            prop_assert!(x + half <= width as f64, "right edge crossed: x={}", x);
        }
    }

    #[test]
    fn linear_left_clamp_is_sticky(
        acceleration in -50.0f64..-5.0,
    ) {
        let mut sim = linear(800, 400);
        sim.set_acceleration(acceleration);
        let half = LinearMotionSim::half_width();

        let mut clamped_at = None;
        for i in 0..2000 {
            sim.step(DEFAULT_DT);
            if clamped_at.is_none() && sim.telemetry().position == half {
                clamped_at = Some(i);
            }
            if clamped_at.is_some() {
                prop_assert_eq!(sim.telemetry().position, half);
                prop_assert_eq!(sim.telemetry().velocity, 0.0);
            }
        }
        prop_assert!(clamped_at.is_some(), "never reached the left wall");
    }
}

// =============================================================================
// Linear motion: resize
// =============================================================================

proptest! {
    #[test]
    fn linear_resize_is_idempotent(
        width in 1u32..2000,
        height in 1u32..1200,
        acceleration in -50.0f64..50.0,
    ) {
        let size = Dimensions::new(width, height).unwrap();

        let mut once = linear(800, 400);
        once.set_acceleration(acceleration);
        for _ in 0..90 {
            once.tick();
        }
        let mut twice = once.clone();

        once.resize(size);
        twice.resize(size);
        twice.resize(size);

        prop_assert_eq!(once.body().position(), twice.body().position());
        prop_assert_eq!(once.body().velocity(), twice.body().velocity());
        prop_assert_eq!(once.world().anchor(), twice.world().anchor());
        prop_assert_eq!(once.initial_position(), twice.initial_position());
    }
}

// =============================================================================
// Harmonic motion: frequency law and resize
// =============================================================================

proptest! {
    #[test]
    fn harmonic_frequency_law_after_mass_change(
        stiffness in 10.0f64..200.0,
        mass in 0.1f64..1.0,
    ) {
        let mut sim = HarmonicMotionSim::default();
        sim.set_stiffness(stiffness);
        sim.set_mass(Mass::new(mass).unwrap());
        sim.reset();

        let expected = (stiffness / mass).sqrt() / TAU;
        let t = sim.telemetry();
        prop_assert!((t.frequency - expected).abs() < 1e-12);
        prop_assert!((t.period - 1.0 / expected).abs() < 1e-9);
        prop_assert_eq!(t.frequency, natural_frequency(stiffness, mass));
    }

    #[test]
    fn harmonic_resize_is_idempotent(
        width in 1u32..2000,
        height in 1u32..1200,
        amplitude in 10.0f64..200.0,
    ) {
        let size = Dimensions::new(width, height).unwrap();

        let mut once = HarmonicMotionSim::default();
        once.set_amplitude(amplitude);
        for _ in 0..45 {
            once.tick();
        }
        let mut twice = once.clone();

        once.resize(size);
        twice.resize(size);
        twice.resize(size);

        prop_assert_eq!(once.body().position(), twice.body().position());
        prop_assert_eq!(once.world().anchor(), twice.world().anchor());
        prop_assert_eq!(once.elapsed(), twice.elapsed());
    }

    #[test]
    fn harmonic_stays_finite(
        stiffness in 10.0f64..200.0,
        mass in 0.1f64..1.0,
        amplitude in 10.0f64..200.0,
    ) {
        let mut sim = HarmonicMotionSim::default();
        sim.set_stiffness(stiffness);
        sim.set_mass(Mass::new(mass).unwrap());
        sim.set_amplitude(amplitude);

        for _ in 0..600 {
            sim.step(fps(60));
            prop_assert!(sim.body().position().is_finite());
            prop_assert!(sim.body().velocity().is_finite());
        }
    }
}
