// Pixel-space geometry primitives shared by the resolver and the controller.
//
// Two coordinate spaces appear in this workspace:
// - screen frames live in desktop space: origin at the bottom-left of the
//   primary screen, y grows upwards;
// - window frames live in window space: origin at the top-left of the primary
//   screen, y grows downwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// A size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

/// Returns true when `a` and `b` differ by at most `eps`.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Length of the overlap of the closed ranges `[a1, a2]` and `[b1, b2]`.
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// The zero rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    /// Construct a rectangle from origin and size components.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle from a position and a size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Left edge.
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }
    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }
    /// Smallest y.
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }
    /// Largest y.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }
    /// Horizontal centre.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }
    /// Vertical centre.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Rectangle origin.
    #[inline]
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Rectangle size.
    #[inline]
    pub fn size(&self) -> Size {
        Size {
            width: self.w,
            height: self.h,
        }
    }

    /// Rectangle with every component rounded to the nearest integer.
    pub fn round(&self) -> Self {
        Self::new(self.x.round(), self.y.round(), self.w.round(), self.h.round())
    }

    /// Per-component absolute differences `(dx, dy, dw, dh)`.
    #[inline]
    pub fn diffs(&self, other: &Self) -> (f64, f64, f64, f64) {
        (
            (self.x - other.x).abs(),
            (self.y - other.y).abs(),
            (self.w - other.w).abs(),
            (self.h - other.h).abs(),
        )
    }

    /// Returns true when every component is within `eps` of `other`.
    #[inline]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let d = self.diffs(other);
        d.0 <= eps && d.1 <= eps && d.2 <= eps && d.3 <= eps
    }

    /// Area of the intersection of two rectangles, zero when disjoint.
    pub fn intersection_area(&self, other: &Self) -> f64 {
        overlap_1d(self.min_x(), self.max_x(), other.min_x(), other.max_x())
            * overlap_1d(self.min_y(), self.max_y(), other.min_y(), other.max_y())
    }

    /// Linear interpolation between `self` (t = 0) and `to` (t = 1).
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self::new(
            lerp(self.x, to.x, t),
            lerp(self.y, to.y, t),
            lerp(self.w, to.w, t),
            lerp(self.h, to.h, t),
        )
    }

    /// Mirror a rectangle between desktop space and window space.
    ///
    /// The mapping is its own inverse; `anchor_height` is the full height of
    /// the primary screen.
    pub fn flipped(&self, anchor_height: f64) -> Self {
        Self::new(self.x, anchor_height - self.max_y(), self.w, self.h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1},{:.1},{:.1},{:.1})",
            self.x, self.y, self.w, self.h
        )
    }
}

impl From<(Point, Size)> for Rect {
    fn from(v: (Point, Size)) -> Self {
        Self::from_parts(v.0, v.1)
    }
}

impl From<Rect> for (Point, Size) {
    fn from(r: Rect) -> Self {
        (r.origin(), r.size())
    }
}
