//! Controller configuration.
//!
//! Configuration is plain data with serde defaults, so a RON file only needs
//! to name the fields it changes:
//!
//! ```ron
//! (
//!     grid_tolerance: 2.0,
//!     animation: WhenOnBattery(250),
//!     context_aware_grid: WhenNonConsecutive,
//! )
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{desktop::PowerState, ease::Easing, error::Result};

/// Lowest accepted tick rate.
pub const MIN_FRAME_RATE: u32 = 1;
/// Highest accepted tick rate.
pub const MAX_FRAME_RATE: u32 = 240;

/// When to animate, with durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationPolicy {
    /// Always jump straight to the target.
    Disabled,
    /// Always animate.
    Enabled(u64),
    /// Animate unless running on battery.
    WhenOnBattery(u64),
    /// Animate unless on battery or reduced motion is requested.
    Auto(u64),
}

impl Default for AnimationPolicy {
    fn default() -> Self {
        Self::Auto(200)
    }
}

impl AnimationPolicy {
    /// Animation duration under `power`, or `None` to apply in one step.
    pub fn effective_duration(self, power: PowerState) -> Option<Duration> {
        let ms = match self {
            Self::Disabled => return None,
            Self::Enabled(ms) => ms,
            Self::WhenOnBattery(ms) if !power.on_battery => ms,
            Self::Auto(ms) if !power.on_battery && !power.reduce_motion => ms,
            Self::WhenOnBattery(_) | Self::Auto(_) => return None,
        };
        (ms > 0).then(|| Duration::from_millis(ms))
    }
}

/// Whether live window edges are merged into a transition's breakpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextAwareGrid {
    /// Always merge.
    Enabled,
    /// Never merge.
    #[default]
    Disabled,
    /// Merge unless this transition repeats the previous transition's kind.
    WhenNonConsecutive,
}

impl ContextAwareGrid {
    /// Decide for a transition of `kind` following one of `previous` kind.
    pub fn applies(self, kind: &str, previous: Option<&str>) -> bool {
        match self {
            Self::Enabled => true,
            Self::Disabled => false,
            Self::WhenNonConsecutive => previous != Some(kind),
        }
    }
}

/// Tunables for a [`crate::TransitionController`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerCfg {
    /// Distance (percentage points) below which breakpoints are coalesced.
    pub grid_tolerance: f64,
    /// Animation policy.
    pub animation: AnimationPolicy,
    /// Progress curve.
    pub easing: Easing,
    /// Animation ticks per second.
    pub frame_rate: u32,
    /// Live-edge enrichment policy.
    pub context_aware_grid: ContextAwareGrid,
    /// Extra apply attempts after the animation when the window lags.
    pub max_retries: u32,
    /// Delay between convergence checks in milliseconds.
    pub retry_delay_ms: u64,
    /// Pixel tolerance for convergence.
    pub verify_eps: f64,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            grid_tolerance: 1.0,
            animation: AnimationPolicy::default(),
            easing: Easing::default(),
            frame_rate: 60,
            context_aware_grid: ContextAwareGrid::default(),
            max_retries: 3,
            retry_delay_ms: 50,
            verify_eps: 2.0,
        }
    }
}

impl ControllerCfg {
    /// Parse from RON text.
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Read and parse a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Interval between animation ticks.
    pub fn tick_interval(&self) -> Duration {
        let rate = self.frame_rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
        Duration::from_secs(1) / rate
    }

    /// Delay between convergence checks.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
