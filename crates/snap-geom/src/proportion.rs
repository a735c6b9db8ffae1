//! Dimensionless ratios used for all screen-relative geometry.
//!
//! A [`Proportion`] is either a fraction (`0..=1`) or a percentage
//! (`0..=100`). Both views are always available; equality, ordering and
//! hashing use the percentage view so values of either tag interoperate.
//! Arithmetic treats both operands as percentages and yields a
//! percentage-tagged result.
//!
//! The encoded form is the bare percentage. Decoding therefore always yields a
//! percentage-tagged value: the round trip preserves the value, not the tag.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Sub},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Number of decimal digits kept when deriving ratios from pixel geometry.
pub const RATIO_DIGITS: i32 = 4;

/// Precision used to cancel binary float noise when switching views.
const VIEW_SCALE: f64 = 1e9;

#[inline]
fn clean(v: f64) -> f64 {
    (v * VIEW_SCALE).round() / VIEW_SCALE
}

/// Round to `digits` decimal digits using round-half-to-even.
#[inline]
pub fn round_ratio(v: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (v * scale).round_ties_even() / scale
}

/// A ratio viewable as a fraction or a percentage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum Proportion {
    /// A fraction, nominally in `0..=1`.
    Fractional(f64),
    /// A percentage, nominally in `0..=100`.
    Percentual(f64),
}

impl Proportion {
    /// 0%.
    pub const ZERO: Self = Self::Percentual(0.0);
    /// 100%.
    pub const FULL: Self = Self::Percentual(100.0);

    /// Construct a fraction-tagged proportion.
    #[inline]
    pub const fn fractional(v: f64) -> Self {
        Self::Fractional(v)
    }

    /// Construct a percentage-tagged proportion.
    #[inline]
    pub const fn percentual(v: f64) -> Self {
        Self::Percentual(v)
    }

    /// Fraction view (`percentage / 100`).
    pub fn fraction(self) -> f64 {
        match self {
            Self::Fractional(v) => v,
            Self::Percentual(v) => clean(v / 100.0),
        }
    }

    /// Percentage view (`fraction * 100`).
    pub fn percentage(self) -> f64 {
        match self {
            Self::Fractional(v) => clean(v * 100.0),
            Self::Percentual(v) => v,
        }
    }

    /// True when the underlying value is NaN.
    pub fn is_nan(self) -> bool {
        match self {
            Self::Fractional(v) | Self::Percentual(v) => v.is_nan(),
        }
    }

    /// True when the percentage view lies within `0..=100`.
    pub fn is_in_range(self) -> bool {
        (0.0..=100.0).contains(&self.percentage())
    }

    /// Absolute value, percentage-tagged.
    pub fn abs(self) -> Self {
        Self::Percentual(self.percentage().abs())
    }

    /// The smaller of two proportions. NaN propagates.
    pub fn min(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::Percentual(f64::NAN);
        }
        if other < self { other } else { self }
    }

    /// The larger of two proportions. NaN propagates.
    pub fn max(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::Percentual(f64::NAN);
        }
        if other > self { other } else { self }
    }
}

impl Default for Proportion {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Proportion {
    fn from(percentage: f64) -> Self {
        Self::Percentual(percentage)
    }
}

impl From<Proportion> for f64 {
    fn from(p: Proportion) -> Self {
        p.percentage()
    }
}

impl PartialEq for Proportion {
    fn eq(&self, other: &Self) -> bool {
        self.percentage() == other.percentage()
    }
}

impl PartialOrd for Proportion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.percentage().partial_cmp(&other.percentage())
    }
}

impl Hash for Proportion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.percentage()).hash(state);
    }
}

impl fmt::Display for Proportion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

macro_rules! percentage_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Proportion {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::Percentual(self.percentage() $op rhs.percentage())
            }
        }
    };
}

percentage_op!(Add, add, +);
percentage_op!(Sub, sub, -);
percentage_op!(Mul, mul, *);
percentage_op!(Div, div, /);
