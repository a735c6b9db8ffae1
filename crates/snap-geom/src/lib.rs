//! snap-geom: resolution-independent window geometry and snapping.
//!
//! Windows are described relative to a screen's visible frame
//! ([`WindowCoordinates`]). Symbolic requests ([`WindowTransition`]) are
//! resolved against axis-tagged [`Breakpoints`] with a directional
//! nearest-edge search, and mapped back to pixel frames for a concrete
//! [`Screen`].

mod anchor;
mod breakpoints;
mod coords;
mod error;
mod geom;
mod neighbor;
mod proportion;
mod screen;
mod transition;

pub use anchor::{
    ANCHOR_TOLERANCE, ClosestAnchor, Edge, ResizeBehavior, WindowCoordinate, closest_anchor,
    find_closest_anchor, window_edges,
};
pub use breakpoints::{Axis, Breakpoint, Breakpoints};
pub use coords::WindowCoordinates;
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size, approx_eq, overlap_1d};
pub use neighbor::{NeighborMap, neighbor_screen};
pub use proportion::{Proportion, RATIO_DIGITS, round_ratio};
pub use screen::{Dock, Screen, ScreenProvider, StaticScreen, StaticScreens};
pub use transition::WindowTransition;
