//! Scenario files: a desktop layout, one window and the transitions to replay.

use std::{fs, path::Path, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use snap_geom::{Rect, Size, StaticScreen, StaticScreens, WindowTransition};
use snap_motion::{PowerState, StaticDesktop, VirtualWindow, WindowId};

use crate::error::{Error, Result};

/// The window driven by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimWindow {
    /// Identifier, distinct from every entry in `others`.
    #[serde(default = "default_window_id")]
    pub id: WindowId,
    /// Initial frame in window space.
    pub frame: Rect,
    /// Minimum size the window clamps requests to.
    #[serde(default)]
    pub min_size: Option<Size>,
    /// Whether the owning app starts in enhanced UI mode.
    #[serde(default)]
    pub enhanced_ui: bool,
    /// Accept but ignore every mutation.
    #[serde(default)]
    pub ignore_sets: bool,
    /// Delay applied to every mutation, in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

fn default_window_id() -> WindowId {
    1
}

/// Another visible window; its edges feed context-aware grids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherWindow {
    /// Identifier.
    pub id: WindowId,
    /// Frame in window space.
    pub frame: Rect,
}

/// A complete replay description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Screens in provider order.
    pub screens: Vec<StaticScreen>,
    /// Main screen id when it is not the primary.
    #[serde(default)]
    pub main_screen: Option<u32>,
    /// Active screen id when it is not the main.
    #[serde(default)]
    pub active_screen: Option<u32>,
    /// The controlled window.
    pub window: SimWindow,
    /// Other visible windows.
    #[serde(default)]
    pub others: Vec<OtherWindow>,
    /// Power conditions.
    #[serde(default)]
    pub power: PowerState,
    /// Transitions submitted in order.
    pub transitions: Vec<WindowTransition>,
}

impl Scenario {
    /// Parse and validate a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<()> {
        if self.screens.is_empty() {
            return Err(Error::other("scenario has no screens"));
        }
        for id in [self.main_screen, self.active_screen].into_iter().flatten() {
            if !self.screens.iter().any(|s| s.id == id) {
                return Err(Error::other(format!("unknown screen id {id}")));
            }
        }
        if self.others.iter().any(|o| o.id == self.window.id) {
            return Err(Error::other(format!(
                "window id {} is also listed in others",
                self.window.id
            )));
        }
        Ok(())
    }

    /// The screen layout.
    pub fn screen_layout(&self) -> StaticScreens {
        StaticScreens {
            screens: self.screens.clone(),
            main: self.main_screen,
            active: self.active_screen,
        }
    }

    /// Desktop holding the layout, the other windows and the power state.
    pub fn desktop(&self) -> Arc<StaticDesktop> {
        let desktop = StaticDesktop::new(self.screen_layout());
        desktop.set_windows(self.others.iter().map(|o| (o.id, o.frame)).collect());
        desktop.set_power(self.power);
        Arc::new(desktop)
    }

    /// In-memory window configured as described.
    pub fn virtual_window(&self) -> VirtualWindow {
        let w = &self.window;
        let window = VirtualWindow::new(w.id, w.frame);
        window.set_min_size(w.min_size);
        window.set_ignore_sets(w.ignore_sets);
        window.set_latency(w.latency_ms.map(Duration::from_millis));
        window.preset_enhanced_ui(w.enhanced_ui);
        window
    }
}
