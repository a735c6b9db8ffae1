//! Symbolic window transitions and their resolution.
//!
//! A [`WindowTransition`] names what the user asked for. Resolution is a pure
//! function of the current frame, the screen it sits on and the screen
//! layout; `None` means there is nothing to do.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    anchor::{ClosestAnchor, Edge, ResizeBehavior, find_closest_anchor},
    breakpoints::{Axis, Breakpoints},
    coords::WindowCoordinates,
    error::Result,
    geom::Rect,
    neighbor::neighbor_screen,
    proportion::Proportion,
    screen::ScreenProvider,
};

/// A requested change of window geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", deny_unknown_fields)]
pub enum WindowTransition {
    /// Place the window at fixed coordinates.
    Absolute {
        /// Target placement.
        value: WindowCoordinates,
    },
    /// Move to the neighbor screen in the direction arc `a..=b` degrees.
    MoveToScreen {
        /// Arc start, degrees counter-clockwise from east.
        a: f64,
        /// Arc end.
        b: f64,
    },
    /// Snap every edge to the grid.
    SnapToGrid {
        /// Direction edges may move.
        behavior: ResizeBehavior,
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move left to the next horizontal breakpoint.
    MoveLeft {
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move right to the next horizontal breakpoint.
    MoveRight {
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move up to the next vertical breakpoint.
    MoveUp {
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move down to the next vertical breakpoint.
    MoveDown {
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move the left edge, keeping the right edge fixed.
    ResizeLeft {
        /// Grow outwards or shrink inwards.
        behavior: ResizeBehavior,
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move the right edge, keeping the left edge fixed.
    ResizeRight {
        /// Grow outwards or shrink inwards.
        behavior: ResizeBehavior,
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move the top edge, keeping the bottom edge fixed.
    ResizeTop {
        /// Grow outwards or shrink inwards.
        behavior: ResizeBehavior,
        /// Grid lines.
        breakpoints: Breakpoints,
    },
    /// Move the bottom edge, keeping the top edge fixed.
    ResizeBottom {
        /// Grow outwards or shrink inwards.
        behavior: ResizeBehavior,
        /// Grid lines.
        breakpoints: Breakpoints,
    },
}

/// Move the whole window so the matched edge lands on its breakpoint.
fn translate(mut c: WindowCoordinates, anchor: &ClosestAnchor) -> WindowCoordinates {
    let delta = Proportion::percentual(anchor.delta());
    match anchor.coordinate.edge {
        Edge::X => c.x = anchor.breakpoint,
        Edge::Y => c.y = anchor.breakpoint,
        Edge::MaxX => c.x = c.x + delta,
        Edge::MaxY => c.y = c.y + delta,
    }
    c
}

/// Move one edge to `target`, holding the opposite edge.
fn resize_edge(mut c: WindowCoordinates, edge: Edge, target: Proportion) -> WindowCoordinates {
    match edge {
        Edge::X => {
            let max_x = c.max_x();
            c.x = target.min(max_x);
            c.w = max_x - c.x;
        }
        Edge::Y => {
            let max_y = c.max_y();
            c.y = target.min(max_y);
            c.h = max_y - c.y;
        }
        Edge::MaxX => c.w = (target - c.x).max(Proportion::ZERO),
        Edge::MaxY => c.h = (target - c.y).max(Proportion::ZERO),
    }
    c
}

/// Find a target for a single edge under `behavior`.
fn edge_target(
    c: &WindowCoordinates,
    breakpoints: &Breakpoints,
    edge: Edge,
    behavior: ResizeBehavior,
) -> Option<Proportion> {
    find_closest_anchor(c, &breakpoints.on(edge.axis()), behavior, |e| e == edge)
        .map(|a| a.breakpoint)
}

impl WindowTransition {
    /// Decode from the tagged JSON form.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Encode to the tagged JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Variant name as used in the encoded form.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absolute { .. } => "absolute",
            Self::MoveToScreen { .. } => "moveToScreen",
            Self::SnapToGrid { .. } => "snapToGrid",
            Self::MoveLeft { .. } => "moveLeft",
            Self::MoveRight { .. } => "moveRight",
            Self::MoveUp { .. } => "moveUp",
            Self::MoveDown { .. } => "moveDown",
            Self::ResizeLeft { .. } => "resizeLeft",
            Self::ResizeRight { .. } => "resizeRight",
            Self::ResizeTop { .. } => "resizeTop",
            Self::ResizeBottom { .. } => "resizeBottom",
        }
    }

    /// Breakpoints carried by this transition, if any.
    pub fn breakpoints(&self) -> Option<&Breakpoints> {
        match self {
            Self::Absolute { .. } | Self::MoveToScreen { .. } => None,
            Self::SnapToGrid { breakpoints, .. }
            | Self::MoveLeft { breakpoints }
            | Self::MoveRight { breakpoints }
            | Self::MoveUp { breakpoints }
            | Self::MoveDown { breakpoints }
            | Self::ResizeLeft { breakpoints, .. }
            | Self::ResizeRight { breakpoints, .. }
            | Self::ResizeTop { breakpoints, .. }
            | Self::ResizeBottom { breakpoints, .. } => Some(breakpoints),
        }
    }

    /// The same transition with its breakpoints replaced.
    ///
    /// Variants without breakpoints are returned unchanged.
    pub fn with_breakpoints(&self, replacement: Breakpoints) -> Self {
        let mut next = self.clone();
        match &mut next {
            Self::Absolute { .. } | Self::MoveToScreen { .. } => {}
            Self::SnapToGrid { breakpoints, .. }
            | Self::MoveLeft { breakpoints }
            | Self::MoveRight { breakpoints }
            | Self::MoveUp { breakpoints }
            | Self::MoveDown { breakpoints }
            | Self::ResizeLeft { breakpoints, .. }
            | Self::ResizeRight { breakpoints, .. }
            | Self::ResizeTop { breakpoints, .. }
            | Self::ResizeBottom { breakpoints, .. } => *breakpoints = replacement,
        }
        next
    }

    /// Axes whose breakpoints this transition consults.
    pub fn axes(&self) -> &'static [Axis] {
        match self {
            Self::Absolute { .. } | Self::MoveToScreen { .. } => &[],
            Self::SnapToGrid { .. } => &[Axis::X, Axis::Y],
            Self::MoveLeft { .. }
            | Self::MoveRight { .. }
            | Self::ResizeLeft { .. }
            | Self::ResizeRight { .. } => &[Axis::X],
            Self::MoveUp { .. }
            | Self::MoveDown { .. }
            | Self::ResizeTop { .. }
            | Self::ResizeBottom { .. } => &[Axis::Y],
        }
    }

    /// Resolve against coordinates on the current screen.
    ///
    /// A screen move keeps the relative coordinates; the target screen is
    /// chosen by [`WindowTransition::rect`].
    pub fn resolve_coordinates(&self, current: &WindowCoordinates) -> Option<WindowCoordinates> {
        let c = *current;
        match self {
            Self::Absolute { value } => Some(*value),
            Self::MoveToScreen { .. } => Some(c),
            Self::MoveLeft { breakpoints } => {
                Self::shift(c, breakpoints, Axis::X, ResizeBehavior::Shrink)
            }
            Self::MoveRight { breakpoints } => {
                Self::shift(c, breakpoints, Axis::X, ResizeBehavior::Grow)
            }
            Self::MoveUp { breakpoints } => {
                Self::shift(c, breakpoints, Axis::Y, ResizeBehavior::Shrink)
            }
            Self::MoveDown { breakpoints } => {
                Self::shift(c, breakpoints, Axis::Y, ResizeBehavior::Grow)
            }
            Self::ResizeLeft { behavior, breakpoints } => {
                edge_target(&c, breakpoints, Edge::X, behavior.inverted())
                    .map(|t| resize_edge(c, Edge::X, t))
            }
            Self::ResizeTop { behavior, breakpoints } => {
                edge_target(&c, breakpoints, Edge::Y, behavior.inverted())
                    .map(|t| resize_edge(c, Edge::Y, t))
            }
            Self::ResizeRight { behavior, breakpoints } => {
                edge_target(&c, breakpoints, Edge::MaxX, *behavior)
                    .map(|t| resize_edge(c, Edge::MaxX, t))
            }
            Self::ResizeBottom { behavior, breakpoints } => {
                edge_target(&c, breakpoints, Edge::MaxY, *behavior)
                    .map(|t| resize_edge(c, Edge::MaxY, t))
            }
            Self::SnapToGrid { behavior, breakpoints } => Self::snap(c, breakpoints, *behavior),
        }
    }

    fn shift(
        c: WindowCoordinates,
        breakpoints: &Breakpoints,
        axis: Axis,
        behavior: ResizeBehavior,
    ) -> Option<WindowCoordinates> {
        find_closest_anchor(&c, &breakpoints.on(axis), behavior, |_| true).map(|a| translate(c, &a))
    }

    fn snap(
        c: WindowCoordinates,
        breakpoints: &Breakpoints,
        behavior: ResizeBehavior,
    ) -> Option<WindowCoordinates> {
        let left = edge_target(&c, breakpoints, Edge::X, behavior.inverted());
        let top = edge_target(&c, breakpoints, Edge::Y, behavior.inverted());
        let right = edge_target(&c, breakpoints, Edge::MaxX, behavior);
        let bottom = edge_target(&c, breakpoints, Edge::MaxY, behavior);
        if left.is_none() && top.is_none() && right.is_none() && bottom.is_none() {
            return None;
        }
        let mut next = c;
        let targets = [(Edge::X, left), (Edge::Y, top), (Edge::MaxX, right), (Edge::MaxY, bottom)];
        for (edge, target) in targets {
            if let Some(t) = target {
                next = resize_edge(next, edge, t);
            }
        }
        Some(next)
    }

    /// Resolve to a window-space frame.
    ///
    /// `frame` is the window's current frame and `screen` the screen it is
    /// on. Returns `None` when nothing applies.
    pub fn rect<P>(&self, frame: &Rect, screen: &P::Screen, provider: &P) -> Option<Rect>
    where
        P: ScreenProvider + ?Sized,
    {
        let current = WindowCoordinates::from_window_frame(frame, screen, provider);
        let target_screen = match self {
            Self::MoveToScreen { a, b } => neighbor_screen(provider, screen, *a, *b)?,
            _ => screen.clone(),
        };
        let next = self.resolve_coordinates(&current)?;
        if next.is_nan() {
            return None;
        }
        let rect = next.to_rect(&target_screen, provider);
        debug!(kind = self.kind(), from = %current, to = %next, %rect, "transition_resolved");
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        breakpoints::Breakpoint,
        screen::{StaticScreen, StaticScreens},
    };

    fn coords(x: f64, y: f64, w: f64, h: f64) -> WindowCoordinates {
        WindowCoordinates::from_percentages(x, y, w, h)
    }

    fn xs(values: &[f64]) -> Breakpoints {
        Breakpoints::from_percentages(Axis::X, values.iter().copied())
    }

    fn ys(values: &[f64]) -> Breakpoints {
        Breakpoints::from_percentages(Axis::Y, values.iter().copied())
    }

    #[test]
    fn move_right_lands_leading_edge_on_breakpoint() {
        let t = WindowTransition::MoveRight { breakpoints: xs(&[50.0]) };
        let next = t.resolve_coordinates(&coords(0.0, 0.0, 50.0, 50.0)).unwrap();
        assert_eq!(next, coords(50.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn move_right_by_trailing_edge_preserves_size() {
        let t = WindowTransition::MoveRight {
            breakpoints: xs(&[0.0, 50.0, 100.0]),
        };
        let next = t.resolve_coordinates(&coords(10.0, 0.0, 30.0, 50.0)).unwrap();
        assert_eq!(next, coords(20.0, 0.0, 30.0, 50.0));
    }

    #[test]
    fn move_left_and_up() {
        let left = WindowTransition::MoveLeft {
            breakpoints: xs(&[0.0, 50.0, 100.0]),
        };
        let next = left.resolve_coordinates(&coords(50.0, 0.0, 50.0, 50.0)).unwrap();
        assert_eq!(next, coords(0.0, 0.0, 50.0, 50.0));
        let up = WindowTransition::MoveUp {
            breakpoints: ys(&[0.0, 50.0]),
        };
        let next = up.resolve_coordinates(&coords(0.0, 60.0, 50.0, 30.0)).unwrap();
        assert_eq!(next, coords(0.0, 50.0, 50.0, 30.0));
    }

    #[test]
    fn move_without_match_is_none() {
        let t = WindowTransition::MoveRight { breakpoints: xs(&[0.0]) };
        assert!(t.resolve_coordinates(&coords(0.0, 0.0, 50.0, 50.0)).is_none());
        let wrong_axis = WindowTransition::MoveDown { breakpoints: xs(&[75.0]) };
        assert!(wrong_axis.resolve_coordinates(&coords(0.0, 0.0, 50.0, 50.0)).is_none());
    }

    #[test]
    fn resize_left_grow_keeps_right_edge() {
        let t = WindowTransition::ResizeLeft {
            behavior: ResizeBehavior::Grow,
            breakpoints: xs(&[0.0, 100.0]),
        };
        let next = t.resolve_coordinates(&coords(30.0, 0.0, 50.0, 50.0)).unwrap();
        assert_eq!(next, coords(0.0, 0.0, 80.0, 50.0));
        assert_eq!(next.max_x().percentage(), 80.0);
    }

    #[test]
    fn resize_left_shrink_moves_origin_inwards() {
        let t = WindowTransition::ResizeLeft {
            behavior: ResizeBehavior::Shrink,
            breakpoints: xs(&[0.0, 50.0, 100.0]),
        };
        let next = t.resolve_coordinates(&coords(30.0, 0.0, 50.0, 50.0)).unwrap();
        assert_eq!(next, coords(50.0, 0.0, 30.0, 50.0));
    }

    #[test]
    fn resize_right_and_bottom() {
        let grow = WindowTransition::ResizeRight {
            behavior: ResizeBehavior::Grow,
            breakpoints: xs(&[25.0, 50.0, 75.0, 100.0]),
        };
        let next = grow.resolve_coordinates(&coords(25.0, 0.0, 25.0, 50.0)).unwrap();
        assert_eq!(next, coords(25.0, 0.0, 50.0, 50.0));
        let shrink = WindowTransition::ResizeBottom {
            behavior: ResizeBehavior::Shrink,
            breakpoints: ys(&[0.0, 25.0, 100.0]),
        };
        let next = shrink.resolve_coordinates(&coords(0.0, 10.0, 50.0, 50.0)).unwrap();
        assert_eq!(next, coords(0.0, 10.0, 50.0, 15.0));
    }

    #[test]
    fn resize_top_grow() {
        let t = WindowTransition::ResizeTop {
            behavior: ResizeBehavior::Grow,
            breakpoints: ys(&[0.0, 50.0]),
        };
        let next = t.resolve_coordinates(&coords(0.0, 60.0, 50.0, 40.0)).unwrap();
        assert_eq!(next, coords(0.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn snap_to_grid_applies_origin_then_size() {
        let grid = Breakpoints::grid(4, 4);
        let t = WindowTransition::SnapToGrid {
            behavior: ResizeBehavior::Grow,
            breakpoints: grid,
        };
        let next = t.resolve_coordinates(&coords(30.0, 10.0, 40.0, 30.0)).unwrap();
        // left grows to 25, top to 0, right to 75, bottom to 50
        assert_eq!(next, coords(25.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn snap_to_grid_already_aligned_is_none() {
        let t = WindowTransition::SnapToGrid {
            behavior: ResizeBehavior::Grow,
            breakpoints: Breakpoints::grid(2, 2),
        };
        assert!(t.resolve_coordinates(&coords(0.0, 0.0, 100.0, 100.0)).is_none());
    }

    #[test]
    fn move_to_screen_reanchors() {
        let screens = StaticScreens::new([
            StaticScreen::new(1, "left", Rect::new(0.0, 0.0, 1000.0, 800.0)),
            StaticScreen::new(2, "right", Rect::new(1000.0, 0.0, 2000.0, 800.0)),
        ]);
        let left = screens.get(1).cloned().unwrap();
        let frame = Rect::new(250.0, 200.0, 500.0, 400.0);
        let t = WindowTransition::MoveToScreen { a: 0.0, b: 0.0 };
        let rect = t.rect(&frame, &left, &screens).unwrap();
        assert_eq!(rect, Rect::new(1500.0, 200.0, 1000.0, 400.0));
        let back = WindowTransition::MoveToScreen { a: 180.0, b: 180.0 };
        let right = screens.get(2).cloned().unwrap();
        assert_eq!(back.rect(&rect, &right, &screens), Some(frame));
        assert!(back.rect(&frame, &left, &screens).is_none());
    }

    #[test]
    fn rect_resolves_in_pixels() {
        let screens = StaticScreens::new([
            StaticScreen::new(1, "main", Rect::new(0.0, 0.0, 1600.0, 1000.0)).with_menu_bar(20.0)
        ]);
        let s = screens.get(1).cloned().unwrap();
        let t = WindowTransition::MoveRight { breakpoints: xs(&[50.0]) };
        let rect = t
            .rect(&Rect::new(0.0, 20.0, 800.0, 490.0), &s, &screens)
            .unwrap();
        assert_eq!(rect, Rect::new(800.0, 20.0, 800.0, 490.0));
    }

    #[test]
    fn helpers() {
        let t = WindowTransition::ResizeTop {
            behavior: ResizeBehavior::Shrink,
            breakpoints: ys(&[10.0]),
        };
        assert_eq!(t.kind(), "resizeTop");
        assert_eq!(t.axes(), &[Axis::Y]);
        let replaced = t.with_breakpoints(ys(&[20.0, 30.0]));
        assert_eq!(replaced.breakpoints().map(Breakpoints::len), Some(2));
        let abs = WindowTransition::Absolute { value: coords(0.0, 0.0, 50.0, 50.0) };
        assert!(abs.breakpoints().is_none());
        assert_eq!(abs.with_breakpoints(ys(&[1.0])), abs);
        assert!(abs.axes().is_empty());
    }

    #[test]
    fn tagged_encoding() {
        let t = WindowTransition::ResizeLeft {
            behavior: ResizeBehavior::Grow,
            breakpoints: Breakpoints::new([Breakpoint::x(0.0), Breakpoint::x(50.0)]),
        };
        let json = t.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"resizeLeft","behavior":"grow","breakpoints":["x(0)","x(50)"]}"#
        );
        let back: WindowTransition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let screen: WindowTransition =
            serde_json::from_str(r#"{"type":"moveToScreen","a":90,"b":180}"#).unwrap();
        assert_eq!(screen, WindowTransition::MoveToScreen { a: 90.0, b: 180.0 });
        let abs = r#"{"type":"absolute","value":{"x":0,"y":0,"w":50,"h":100}}"#;
        let abs: WindowTransition = serde_json::from_str(abs).unwrap();
        assert_eq!(abs, WindowTransition::Absolute { value: coords(0.0, 0.0, 50.0, 100.0) });
    }

    #[test]
    fn decoding_requires_variant_fields() {
        let rejects = |json: &str| serde_json::from_str::<WindowTransition>(json).is_err();
        assert!(rejects(r#"{"type":"moveLeft"}"#));
        assert!(rejects(r#"{"type":"resizeTop","breakpoints":[]}"#));
        assert!(rejects(r#"{"type":"moveToScreen","a":1}"#));
        assert!(matches!(
            WindowTransition::from_json(r#"{"type":"teleport"}"#),
            Err(crate::Error::Json(_))
        ));
        assert!(rejects(r#"{"type":"moveUp","breakpoints":["z(10)"]}"#));
        assert!(rejects(r#"{"type":"moveUp","breakpoints":[],"behavior":"grow"}"#));
    }

    fn resize(edge: Edge, behavior: ResizeBehavior, breakpoints: Breakpoints) -> WindowTransition {
        match edge {
            Edge::X => WindowTransition::ResizeLeft { behavior, breakpoints },
            Edge::Y => WindowTransition::ResizeTop { behavior, breakpoints },
            Edge::MaxX => WindowTransition::ResizeRight { behavior, breakpoints },
            Edge::MaxY => WindowTransition::ResizeBottom { behavior, breakpoints },
        }
    }

    #[test]
    fn resize_past_fixed_edge_collapses_to_zero() {
        let c = coords(30.0, 30.0, 20.0, 20.0);
        let shrink = ResizeBehavior::Shrink;

        let left = resize(Edge::X, shrink, xs(&[80.0])).resolve_coordinates(&c).unwrap();
        assert_eq!(left, coords(50.0, 30.0, 0.0, 20.0));
        assert_eq!(left.max_x(), c.max_x());

        let top = resize(Edge::Y, shrink, ys(&[80.0])).resolve_coordinates(&c).unwrap();
        assert_eq!(top, coords(30.0, 50.0, 20.0, 0.0));
        assert_eq!(top.max_y(), c.max_y());

        let right = resize(Edge::MaxX, shrink, xs(&[10.0])).resolve_coordinates(&c).unwrap();
        assert_eq!(right, coords(30.0, 30.0, 0.0, 20.0));

        let bottom = resize(Edge::MaxY, shrink, ys(&[10.0])).resolve_coordinates(&c).unwrap();
        assert_eq!(bottom, coords(30.0, 30.0, 20.0, 0.0));
    }

    proptest! {
        #[test]
        fn resize_never_crosses_fixed_edge(
            pos in 0.0f64..100.0,
            len in 0.0f64..1.0,
            bp in 0.0f64..=100.0,
            grow in any::<bool>(),
            edge_index in 0usize..4,
        ) {
            let edge = Edge::ALL[edge_index];
            let size = len * (100.0 - pos);
            let behavior = if grow { ResizeBehavior::Grow } else { ResizeBehavior::Shrink };
            let c = coords(pos, pos, size, size);
            let bps = Breakpoints::from_percentages(edge.axis(), [bp]);
            if let Some(next) = resize(edge, behavior, bps).resolve_coordinates(&c) {
                prop_assert!(next.w.percentage() >= 0.0);
                prop_assert!(next.h.percentage() >= 0.0);
                match edge {
                    Edge::X => prop_assert!(
                        (next.max_x().percentage() - c.max_x().percentage()).abs() < 1e-9
                    ),
                    Edge::Y => prop_assert!(
                        (next.max_y().percentage() - c.max_y().percentage()).abs() < 1e-9
                    ),
                    Edge::MaxX => prop_assert_eq!(next.x, c.x),
                    Edge::MaxY => prop_assert_eq!(next.y, c.y),
                }
            }
        }
    }
}
