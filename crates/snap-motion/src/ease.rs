//! Progress curves for frame interpolation.

use serde::{Deserialize, Serialize};

/// Easing curve applied to linear animation progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic ease-in-out.
    QuadInOut,
    /// Cubic ease-in-out.
    #[default]
    CubicInOut,
}

#[inline]
fn quad_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let t1 = 2.0f64.mul_add(-t, 2.0);
        (-0.5 * t1).mul_add(t1, 1.0)
    }
}

#[inline]
fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let t1 = 2.0f64.mul_add(t, -2.0);
        (0.5 * t1 * t1).mul_add(t1, 1.0)
    }
}

impl Easing {
    /// Eased progress for linear progress `t`, clamped to `0..=1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::QuadInOut => quad_in_out(t),
            Self::CubicInOut => cubic_in_out(t),
        }
    }
}
