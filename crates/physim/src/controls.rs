//! Mapping between UI controls and physical parameters.
//!
//! The simulations accept any value for their parameters. The control
//! ranges a front end should offer live here, as integer slider positions
//! and the divisor that turns a position into a physical value.
//!
//! # Example
//!
//! ```rust
//! use physim::controls::{ACCELERATION, MASS};
//!
//! assert_eq!(ACCELERATION.value(-2500), -25.0);
//! assert_eq!(ACCELERATION.value(9999), 50.0);
//! assert_eq!(MASS.value(MASS.default), 1.0);
//! ```

use crate::sim::{Dimensions, MAX_SIDE};

/// An integer slider and how its positions map to physical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderScale {
    /// Lowest position.
    pub min: i32,
    /// Highest position.
    pub max: i32,
    /// Initial position.
    pub default: i32,
    /// Position units per physical unit.
    pub divisor: f64,
}

impl SliderScale {
    /// Physical value for a slider position, clamping the position first.
    pub fn value(&self, position: i32) -> f64 {
        f64::from(position.clamp(self.min, self.max)) / self.divisor
    }

    /// Nearest slider position for a physical value, clamped to the range.
    pub fn position(&self, value: f64) -> i32 {
        let raw = (value * self.divisor).round();
        if raw.is_nan() {
            return self.default;
        }
        raw.clamp(f64::from(self.min), f64::from(self.max)) as i32
    }

    /// Lowest physical value.
    pub fn min_value(&self) -> f64 {
        self.value(self.min)
    }

    /// Highest physical value.
    pub fn max_value(&self) -> f64 {
        self.value(self.max)
    }

    /// Physical value at the default position.
    pub fn default_value(&self) -> f64 {
        self.value(self.default)
    }
}

/// Linear drive, m/s²: ±50.00 in steps of 0.01.
pub const ACCELERATION: SliderScale = SliderScale {
    min: -5000,
    max: 5000,
    default: 0,
    divisor: 100.0,
};

/// Release offset, pixels.
pub const AMPLITUDE: SliderScale = SliderScale {
    min: 10,
    max: 200,
    default: 100,
    divisor: 1.0,
};

/// Spring stiffness, N/m.
pub const STIFFNESS: SliderScale = SliderScale {
    min: 10,
    max: 200,
    default: 50,
    divisor: 1.0,
};

/// Hanging mass, kg: 0.1 to 1.0 in steps of 0.1.
pub const MASS: SliderScale = SliderScale {
    min: 1,
    max: 10,
    default: 10,
    divisor: 10.0,
};

/// Percentage of the available width given to the canvas.
const CANVAS_WIDTH_PERCENT: u64 = 95;

/// Percentage of the available height the harmonic canvas takes.
const HARMONIC_HEIGHT_PERCENT: u64 = 70;

/// How a screen sizes its simulation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasLayout {
    /// 2:1 strip for the sliding box, at least 300×150.
    Linear,
    /// Tall panel for the hanging mass, at least 300×300.
    Harmonic,
}

impl CanvasLayout {
    /// Smallest canvas this layout produces.
    pub const fn min_size(self) -> (u32, u32) {
        match self {
            Self::Linear => (300, 150),
            Self::Harmonic => (300, 300),
        }
    }

    /// Canvas size for the available room, in pixels.
    ///
    /// Both layouts take 95 % of the width. The linear canvas keeps a 2:1
    /// aspect ratio; the harmonic one takes 70 % of the height. Results
    /// are raised to [`min_size`](Self::min_size) and capped at
    /// [`MAX_SIDE`].
    ///
    /// ```rust
    /// use physim::controls::CanvasLayout;
    ///
    /// let size = CanvasLayout::Linear.fit(1000, 900);
    /// assert_eq!((size.width(), size.height()), (950, 475));
    ///
    /// let size = CanvasLayout::Harmonic.fit(1000, 900);
    /// assert_eq!((size.width(), size.height()), (950, 630));
    ///
    /// let size = CanvasLayout::Harmonic.fit(100, 100);
    /// assert_eq!((size.width(), size.height()), (300, 300));
    /// ```
    pub fn fit(self, available_width: u32, available_height: u32) -> Dimensions {
        let width = percent(available_width, CANVAS_WIDTH_PERCENT);
        let height = match self {
            Self::Linear => width / 2,
            Self::Harmonic => percent(available_height, HARMONIC_HEIGHT_PERCENT),
        };
        let (min_width, min_height) = self.min_size();
        Dimensions::new_unchecked(
            width.clamp(min_width, MAX_SIDE),
            height.clamp(min_height, MAX_SIDE),
        )
    }
}

fn percent(value: u32, percent: u64) -> u32 {
    (u64::from(value) * percent / 100) as u32
}
