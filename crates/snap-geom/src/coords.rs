//! Resolution-independent window placement.
//!
//! [`WindowCoordinates`] expresses a window as proportions of a screen's
//! visible frame with a top-left origin. Converting a pixel frame to
//! coordinates and back yields the original frame up to pixel rounding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    anchor::Edge,
    geom::Rect,
    proportion::{Proportion, RATIO_DIGITS, round_ratio},
    screen::{Dock, Screen, ScreenProvider},
};

/// A window placement relative to a screen's visible frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowCoordinates {
    /// Left edge.
    pub x: Proportion,
    /// Top edge.
    pub y: Proportion,
    /// Width.
    pub w: Proportion,
    /// Height.
    pub h: Proportion,
}

/// Offset over available length as a rounded, capped fraction.
fn ratio(offset: f64, available: f64) -> Proportion {
    Proportion::fractional(round_ratio((offset / available).min(1.0), RATIO_DIGITS))
}

impl WindowCoordinates {
    /// Coordinates from four proportions.
    pub fn new(x: Proportion, y: Proportion, w: Proportion, h: Proportion) -> Self {
        Self { x, y, w, h }
    }

    /// Coordinates from four percentages.
    pub fn from_percentages(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(
            Proportion::percentual(x),
            Proportion::percentual(y),
            Proportion::percentual(w),
            Proportion::percentual(h),
        )
    }

    /// The whole visible frame.
    pub fn full() -> Self {
        Self::new(Proportion::ZERO, Proportion::ZERO, Proportion::FULL, Proportion::FULL)
    }

    /// Right edge.
    pub fn max_x(&self) -> Proportion {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn max_y(&self) -> Proportion {
        self.y + self.h
    }

    /// Value of one edge.
    pub fn edge(&self, edge: Edge) -> Proportion {
        match edge {
            Edge::X => self.x,
            Edge::Y => self.y,
            Edge::MaxX => self.max_x(),
            Edge::MaxY => self.max_y(),
        }
    }

    /// True if any component is NaN.
    pub fn is_nan(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().any(|p| p.is_nan())
    }

    /// Express a window-space frame relative to `screen`.
    ///
    /// Without a primary screen the anchor height is zero and offsets are
    /// taken as absolute.
    pub fn from_window_frame<P>(frame: &Rect, screen: &P::Screen, provider: &P) -> Self
    where
        P: ScreenProvider + ?Sized,
    {
        let sf = screen.frame();
        let vf = screen.visible_frame();
        let anchor = provider.anchor_height();

        let origin_x = match screen.dock() {
            Some(Dock::Left) => vf.min_x(),
            _ => sf.min_x(),
        };
        let width = vf.w;

        let upper = anchor - sf.h - sf.y + screen.menu_bar_thickness();
        let height = vf.h;

        Self {
            x: ratio(frame.x - origin_x, width),
            y: ratio(frame.y - upper, height),
            w: ratio(frame.w, width),
            h: ratio(frame.h, height),
        }
    }

    /// Pixel frame in window space for these coordinates on `screen`.
    ///
    /// The height is clamped so the window never extends below the visible
    /// frame.
    pub fn to_rect<P>(&self, screen: &P::Screen, provider: &P) -> Rect
    where
        P: ScreenProvider + ?Sized,
    {
        let vf = screen.visible_frame();
        let anchor = provider.anchor_height();

        let top = anchor - vf.max_y();
        let bottom = anchor - vf.min_y();

        let x = self.x.fraction().mul_add(vf.w, vf.x).round();
        let y = self.y.fraction().mul_add(vf.h, top).round();
        let w = (self.w.fraction() * vf.w).round();
        let mut h = (self.h.fraction() * vf.h).round();
        if y + h > bottom {
            h = (bottom - y).max(0.0);
        }
        Rect::new(x, y, w, h)
    }
}

impl fmt::Display for WindowCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x {} y {} w {} h {}]",
            self.x.percentage(),
            self.y.percentage(),
            self.w.percentage(),
            self.h.percentage()
        )
    }
}
