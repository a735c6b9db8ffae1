//! Screen abstraction consumed by the resolver.
//!
//! Screen frames are in desktop space (bottom-left origin, y up). Algorithms
//! are generic over [`ScreenProvider`] so tests can supply fixed layouts.

use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// Where a dock or taskbar reserves space on a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dock {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}

impl Dock {
    /// Infer dock placement by comparing a frame with its visible frame.
    pub fn detect(frame: &Rect, visible: &Rect) -> Option<Self> {
        if visible.min_x() > frame.min_x() {
            Some(Self::Left)
        } else if visible.max_x() < frame.max_x() {
            Some(Self::Right)
        } else if visible.min_y() > frame.min_y() {
            Some(Self::Bottom)
        } else {
            None
        }
    }
}

/// A physical display.
pub trait Screen: Clone + Debug + Eq + Hash + Send + Sync + 'static {
    /// Full frame in desktop space.
    fn frame(&self) -> Rect;

    /// Frame minus menu bar and dock, in desktop space.
    fn visible_frame(&self) -> Rect;

    /// Height of the menu bar reserved at the top of the screen.
    fn menu_bar_thickness(&self) -> f64;

    /// Human readable name.
    fn name(&self) -> String;

    /// Dock placement, if any.
    fn dock(&self) -> Option<Dock> {
        Dock::detect(&self.frame(), &self.visible_frame())
    }
}

/// Source of the current screen layout.
pub trait ScreenProvider {
    /// Concrete screen type.
    type Screen: Screen;

    /// All screens in a stable order.
    fn screens(&self) -> Vec<Self::Screen>;

    /// The screen anchoring the global coordinate system.
    fn primary(&self) -> Option<Self::Screen> {
        self.screens().into_iter().find(|s| {
            let f = s.frame();
            f.x == 0.0 && f.y == 0.0
        })
    }

    /// The screen holding the key window.
    fn main(&self) -> Option<Self::Screen> {
        self.primary()
    }

    /// The screen the user is working on.
    fn active(&self) -> Option<Self::Screen> {
        self.main()
    }

    /// Height of the primary screen, zero when there is none.
    fn anchor_height(&self) -> f64 {
        self.primary().map_or(0.0, |s| s.frame().h)
    }

    /// The screen sharing the most area with a window-space rectangle.
    ///
    /// Falls back to [`ScreenProvider::main`] when the window is off-screen.
    fn screen_containing(&self, window: &Rect) -> Option<Self::Screen> {
        let desktop = window.flipped(self.anchor_height());
        let mut best: Option<(f64, Self::Screen)> = None;
        for s in self.screens() {
            let area = s.frame().intersection_area(&desktop);
            if area > 0.0 && best.as_ref().is_none_or(|(a, _)| area > *a) {
                best = Some((area, s));
            }
        }
        best.map(|(_, s)| s).or_else(|| self.main())
    }
}

/// A screen described by plain values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticScreen {
    /// Stable identifier; equality and hashing use only this.
    pub id: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Full frame in desktop space.
    pub frame: Rect,
    /// Visible frame in desktop space; defaults to `frame`.
    #[serde(default)]
    pub visible_frame: Option<Rect>,
    /// Menu bar height.
    #[serde(default)]
    pub menu_bar_thickness: f64,
}

impl StaticScreen {
    /// Screen with no menu bar and no dock.
    pub fn new<S: Into<String>>(id: u32, name: S, frame: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            frame,
            visible_frame: None,
            menu_bar_thickness: 0.0,
        }
    }

    /// Reserve `thickness` pixels at the top for a menu bar.
    pub fn with_menu_bar(mut self, thickness: f64) -> Self {
        let mut vf = self.visible_frame();
        vf.h -= thickness - self.menu_bar_thickness;
        self.menu_bar_thickness = thickness;
        self.visible_frame = Some(vf);
        self
    }

    /// Reserve `size` pixels on one edge for a dock.
    pub fn with_dock(mut self, dock: Dock, size: f64) -> Self {
        let mut vf = self.visible_frame();
        match dock {
            Dock::Left => {
                vf.x += size;
                vf.w -= size;
            }
            Dock::Right => vf.w -= size,
            Dock::Bottom => {
                vf.y += size;
                vf.h -= size;
            }
        }
        self.visible_frame = Some(vf);
        self
    }
}

impl PartialEq for StaticScreen {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StaticScreen {}

impl Hash for StaticScreen {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Screen for StaticScreen {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn visible_frame(&self) -> Rect {
        self.visible_frame.unwrap_or(self.frame)
    }

    fn menu_bar_thickness(&self) -> f64 {
        self.menu_bar_thickness
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// A fixed screen layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticScreens {
    /// Screens in provider order.
    pub screens: Vec<StaticScreen>,
    /// Identifier of the main screen, if not the primary.
    #[serde(default)]
    pub main: Option<u32>,
    /// Identifier of the active screen, if not the main.
    #[serde(default)]
    pub active: Option<u32>,
}

impl StaticScreens {
    /// Layout with the given screens.
    pub fn new<I: IntoIterator<Item = StaticScreen>>(screens: I) -> Self {
        Self {
            screens: screens.into_iter().collect(),
            main: None,
            active: None,
        }
    }

    /// Screen with identifier `id`.
    pub fn get(&self, id: u32) -> Option<&StaticScreen> {
        self.screens.iter().find(|s| s.id == id)
    }
}

impl ScreenProvider for StaticScreens {
    type Screen = StaticScreen;

    fn screens(&self) -> Vec<StaticScreen> {
        self.screens.clone()
    }

    fn main(&self) -> Option<StaticScreen> {
        self.main
            .and_then(|id| self.get(id).cloned())
            .or_else(|| self.primary())
    }

    fn active(&self) -> Option<StaticScreen> {
        self.active
            .and_then(|id| self.get(id).cloned())
            .or_else(|| self.main())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> StaticScreen {
        StaticScreen::new(1, "Built-in", Rect::new(0.0, 0.0, 1440.0, 900.0)).with_menu_bar(25.0)
    }

    fn external() -> StaticScreen {
        StaticScreen::new(2, "External", Rect::new(1440.0, 0.0, 1920.0, 1080.0))
    }

    #[test]
    fn menu_bar_and_dock_shape_visible_frame() {
        let s = laptop().with_dock(Dock::Bottom, 70.0);
        assert_eq!(s.visible_frame(), Rect::new(0.0, 70.0, 1440.0, 805.0));
        assert_eq!(s.dock(), Some(Dock::Bottom));
        assert_eq!(laptop().dock(), None);
        assert_eq!(laptop().with_dock(Dock::Left, 60.0).dock(), Some(Dock::Left));
        assert_eq!(laptop().with_dock(Dock::Right, 60.0).dock(), Some(Dock::Right));
    }

    #[test]
    fn identity_is_the_id() {
        let mut renamed = laptop();
        renamed.name = "Other".into();
        renamed.frame = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(renamed, laptop());
        assert_ne!(laptop(), external());
    }

    #[test]
    fn primary_main_active_defaults() {
        let mut screens = StaticScreens::new([external(), laptop()]);
        assert_eq!(screens.primary().map(|s| s.id), Some(1));
        assert_eq!(screens.main().map(|s| s.id), Some(1));
        screens.active = Some(2);
        assert_eq!(screens.active().map(|s| s.id), Some(2));
        assert_eq!(screens.main().map(|s| s.id), Some(1));
        assert_eq!(screens.anchor_height(), 900.0);
    }

    #[test]
    fn screen_containing_uses_largest_overlap() {
        let screens = StaticScreens::new([laptop(), external()]);
        // Window space: y down from the top of the primary screen.
        let on_external = Rect::new(1300.0, 100.0, 800.0, 600.0);
        assert_eq!(screens.screen_containing(&on_external).map(|s| s.id), Some(2));
        let on_laptop = Rect::new(100.0, 100.0, 800.0, 600.0);
        assert_eq!(screens.screen_containing(&on_laptop).map(|s| s.id), Some(1));
        let nowhere = Rect::new(-5000.0, -5000.0, 10.0, 10.0);
        assert_eq!(screens.screen_containing(&nowhere).map(|s| s.id), Some(1));
    }

    #[test]
    fn no_primary_means_zero_anchor() {
        let screens = StaticScreens::new([external()]);
        assert!(screens.primary().is_none());
        assert_eq!(screens.anchor_height(), 0.0);
    }
}
