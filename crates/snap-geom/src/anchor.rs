//! Nearest-edge search against a breakpoint set.
//!
//! Every window edge is a candidate anchor. For each breakpoint we take the
//! nearest edge on the breakpoint's axis, veto it when moving it would go the
//! wrong way for the requested [`ResizeBehavior`], and finally keep the
//! candidate closest to its breakpoint in the permitted direction.

use serde::{Deserialize, Serialize};

use crate::{
    breakpoints::{Axis, Breakpoint, Breakpoints},
    coords::WindowCoordinates,
    proportion::Proportion,
};

/// Edges closer than this (percentage points) are already on the breakpoint.
pub const ANCHOR_TOLERANCE: f64 = 0.09;

/// One of the four window edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Right edge.
    MaxX,
    /// Bottom edge.
    MaxY,
}

impl Edge {
    /// All edges in search order.
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::MaxX, Self::MaxY];

    /// Axis the edge lies on.
    pub fn axis(self) -> Axis {
        match self {
            Self::X | Self::MaxX => Axis::X,
            Self::Y | Self::MaxY => Axis::Y,
        }
    }

    /// True for the edges that carry the origin.
    pub fn is_origin(self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

/// Direction a resize or move is allowed to take an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeBehavior {
    /// Edges may only move towards larger values.
    Grow,
    /// Edges may only move towards smaller values.
    Shrink,
}

impl ResizeBehavior {
    /// The opposite behavior.
    pub fn inverted(self) -> Self {
        match self {
            Self::Grow => Self::Shrink,
            Self::Shrink => Self::Grow,
        }
    }
}

/// An edge together with its current value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowCoordinate {
    /// Which edge.
    pub edge: Edge,
    /// Current position of the edge.
    pub value: Proportion,
}

/// An edge matched to the breakpoint it should move to.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestAnchor {
    /// The matched edge and its current value.
    pub coordinate: WindowCoordinate,
    /// Target breakpoint.
    pub breakpoint: Proportion,
}

impl ClosestAnchor {
    /// Signed distance from the edge to the breakpoint, in percentage points.
    pub fn delta(&self) -> f64 {
        self.breakpoint.percentage() - self.coordinate.value.percentage()
    }

    /// True when the match respects `behavior`.
    fn permitted(&self, behavior: ResizeBehavior) -> bool {
        let value = self.coordinate.value.percentage();
        let target = self.breakpoint.percentage();
        match behavior {
            ResizeBehavior::Shrink => value >= target,
            ResizeBehavior::Grow => value <= target,
        }
    }
}

/// The four edges of `coords` as search candidates.
pub fn window_edges(coords: &WindowCoordinates) -> [WindowCoordinate; 4] {
    Edge::ALL.map(|edge| WindowCoordinate {
        edge,
        value: coords.edge(edge),
    })
}

/// Best candidate for a single breakpoint, before the directional veto.
fn nearest_edge<F>(
    coords: &WindowCoordinates,
    breakpoint: &Breakpoint,
    filter: &F,
) -> Option<ClosestAnchor>
where
    F: Fn(Edge) -> bool,
{
    let target = breakpoint.value.percentage();
    window_edges(coords)
        .into_iter()
        .filter(|c| c.edge.axis() == breakpoint.axis)
        .filter(|c| (c.value.percentage() - target).abs() > ANCHOR_TOLERANCE)
        .filter(|c| filter(c.edge))
        .map(|coordinate| ClosestAnchor {
            coordinate,
            breakpoint: breakpoint.value,
        })
        .fold(None, |best: Option<ClosestAnchor>, c| match best {
            Some(b) if b.delta().abs() <= c.delta().abs() => Some(b),
            _ => Some(c),
        })
}

/// Match a single breakpoint, honouring `behavior`.
pub fn closest_anchor<F>(
    coords: &WindowCoordinates,
    breakpoint: &Breakpoint,
    behavior: ResizeBehavior,
    filter: F,
) -> Option<ClosestAnchor>
where
    F: Fn(Edge) -> bool,
{
    nearest_edge(coords, breakpoint, &filter).filter(|a| a.permitted(behavior))
}

/// Best match over a whole breakpoint set.
///
/// Under [`ResizeBehavior::Shrink`] the winner has the largest (least
/// negative) delta, under [`ResizeBehavior::Grow`] the smallest. Ties keep the
/// earlier breakpoint in set order.
pub fn find_closest_anchor<F>(
    coords: &WindowCoordinates,
    breakpoints: &Breakpoints,
    behavior: ResizeBehavior,
    filter: F,
) -> Option<ClosestAnchor>
where
    F: Fn(Edge) -> bool,
{
    breakpoints
        .iter()
        .filter_map(|b| nearest_edge(coords, b, &filter))
        .filter(|a| a.permitted(behavior))
        .fold(None, |best: Option<ClosestAnchor>, c| match best {
            Some(b) => {
                let better = match behavior {
                    ResizeBehavior::Shrink => c.delta() > b.delta(),
                    ResizeBehavior::Grow => c.delta() < b.delta(),
                };
                Some(if better { c } else { b })
            }
            None => Some(c),
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn coords(x: f64, y: f64, w: f64, h: f64) -> WindowCoordinates {
        WindowCoordinates::from_percentages(x, y, w, h)
    }

    #[test]
    fn edges_at_breakpoint_are_skipped() {
        let c = coords(0.0, 0.0, 50.0, 50.0);
        let a = closest_anchor(&c, &Breakpoint::x(50.0), ResizeBehavior::Grow, |_| true).unwrap();
        assert_eq!(a.coordinate.edge, Edge::X);
        assert_eq!(a.delta(), 50.0);
        let near = coords(0.0, 0.0, 49.95, 50.0);
        let a =
            closest_anchor(&near, &Breakpoint::x(50.0), ResizeBehavior::Grow, |_| true).unwrap();
        assert_eq!(a.coordinate.edge, Edge::X);
    }

    #[test]
    fn veto_applies_after_nearest_pick() {
        // maxX (60) is farther from 50 than x (45), so x is picked and vetoed.
        let c = coords(45.0, 0.0, 15.0, 50.0);
        let bp = Breakpoint::x(50.0);
        assert!(closest_anchor(&c, &bp, ResizeBehavior::Shrink, |_| true).is_none());
        let a = closest_anchor(&c, &bp, ResizeBehavior::Shrink, |e| e == Edge::MaxX).unwrap();
        assert_eq!(a.coordinate.edge, Edge::MaxX);
        assert_eq!(a.delta(), -10.0);
    }

    #[test]
    fn axis_filtering() {
        let c = coords(10.0, 10.0, 10.0, 10.0);
        let a = closest_anchor(&c, &Breakpoint::y(40.0), ResizeBehavior::Grow, |_| true).unwrap();
        assert_eq!(a.coordinate.edge, Edge::MaxY);
    }

    #[test]
    fn set_search_prefers_nearest_permitted() {
        let c = coords(30.0, 0.0, 40.0, 50.0);
        let set = Breakpoints::from_percentages(Axis::X, [0.0, 25.0, 50.0, 75.0, 100.0]);
        let left = find_closest_anchor(&c, &set, ResizeBehavior::Shrink, |_| true).unwrap();
        assert_eq!(left.coordinate.edge, Edge::X);
        assert_eq!(left.breakpoint.percentage(), 25.0);
        let right = find_closest_anchor(&c, &set, ResizeBehavior::Grow, |_| true).unwrap();
        assert_eq!(right.coordinate.edge, Edge::MaxX);
        assert_eq!(right.breakpoint.percentage(), 75.0);
    }

    #[test]
    fn empty_set_has_no_anchor() {
        let c = coords(0.0, 0.0, 100.0, 100.0);
        let none = Breakpoints::default();
        assert!(find_closest_anchor(&c, &none, ResizeBehavior::Grow, |_| true).is_none());
        // Only the far edge of each breakpoint remains, and it points the wrong way.
        let full = Breakpoints::from_percentages(Axis::X, [0.0, 100.0]);
        let far_edge = |e: Edge| e == Edge::MaxX;
        assert!(find_closest_anchor(&c, &full, ResizeBehavior::Grow, far_edge).is_none());
    }

    #[test]
    fn inverted_behavior() {
        assert_eq!(ResizeBehavior::Grow.inverted(), ResizeBehavior::Shrink);
        assert_eq!(ResizeBehavior::Shrink.inverted(), ResizeBehavior::Grow);
    }

    proptest! {
        #[test]
        fn never_violates_direction(
            x in 0.0f64..100.0,
            y in 0.0f64..100.0,
            w in 0.0f64..100.0,
            h in 0.0f64..100.0,
            xs in proptest::collection::vec(0.0f64..=100.0, 0..12),
            ys in proptest::collection::vec(0.0f64..=100.0, 0..12),
            grow in any::<bool>(),
        ) {
            let c = coords(x, y, w, h);
            let set = Breakpoints::from_percentages(Axis::X, xs).merge_percentages(Axis::Y, ys);
            let behavior = if grow { ResizeBehavior::Grow } else { ResizeBehavior::Shrink };
            if let Some(a) = find_closest_anchor(&c, &set, behavior, |_| true) {
                let value = a.coordinate.value.percentage();
                let target = a.breakpoint.percentage();
                match behavior {
                    ResizeBehavior::Shrink => prop_assert!(value >= target),
                    ResizeBehavior::Grow => prop_assert!(value <= target),
                }
                prop_assert!((value - target).abs() > ANCHOR_TOLERANCE);
            }
        }
    }
}
