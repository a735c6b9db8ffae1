//! The desktop a controller works on: screens, other windows and power.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use snap_geom::{Rect, ScreenProvider, StaticScreen, StaticScreens};

use crate::window::WindowId;

/// Power conditions that influence animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    /// Running on battery.
    #[serde(default)]
    pub on_battery: bool,
    /// The user asked for reduced motion.
    #[serde(default)]
    pub reduce_motion: bool,
}

/// Screen layout plus the live state the controller consults.
pub trait Desktop: ScreenProvider + Send + Sync {
    /// Frames of on-screen windows in window space.
    fn visible_windows(&self) -> Vec<(WindowId, Rect)>;

    /// Current power conditions.
    fn power(&self) -> PowerState {
        PowerState::default()
    }
}

/// A desktop described by plain values, adjustable at runtime.
#[derive(Debug, Default)]
pub struct StaticDesktop {
    screens: RwLock<StaticScreens>,
    windows: RwLock<Vec<(WindowId, Rect)>>,
    power: RwLock<PowerState>,
}

impl StaticDesktop {
    /// Desktop with the given screen layout and no other windows.
    pub fn new(screens: StaticScreens) -> Self {
        Self {
            screens: RwLock::new(screens),
            windows: RwLock::new(Vec::new()),
            power: RwLock::new(PowerState::default()),
        }
    }

    /// Replace the screen layout.
    pub fn set_screens(&self, screens: StaticScreens) {
        *self.screens.write() = screens;
    }

    /// Replace the set of other windows.
    pub fn set_windows(&self, windows: Vec<(WindowId, Rect)>) {
        *self.windows.write() = windows;
    }

    /// Replace the power conditions.
    pub fn set_power(&self, power: PowerState) {
        *self.power.write() = power;
    }
}

impl ScreenProvider for StaticDesktop {
    type Screen = StaticScreen;

    fn screens(&self) -> Vec<StaticScreen> {
        self.screens.read().screens()
    }

    fn main(&self) -> Option<StaticScreen> {
        self.screens.read().main()
    }

    fn active(&self) -> Option<StaticScreen> {
        self.screens.read().active()
    }
}

impl Desktop for StaticDesktop {
    fn visible_windows(&self) -> Vec<(WindowId, Rect)> {
        self.windows.read().clone()
    }

    fn power(&self) -> PowerState {
        *self.power.read()
    }
}
