//! snap-motion: animated, serialized window transitions.
//!
//! A [`TransitionController`] takes [`snap_geom::WindowTransition`]s for one
//! window, resolves each against the window's in-flight target, interpolates
//! the frame at a fixed tick rate and verifies that the window got there.
//! Platform access goes through the [`WindowHandle`] and [`Desktop`] traits;
//! [`VirtualWindow`] and [`StaticDesktop`] are in-memory implementations.

mod clock;
mod config;
mod controller;
mod desktop;
mod ease;
mod error;
mod observer;
mod window;

pub use clock::{Clock, TokioClock};
pub use config::{AnimationPolicy, ContextAwareGrid, ControllerCfg, MAX_FRAME_RATE, MIN_FRAME_RATE};
pub use controller::{ControllerState, TransitionController};
pub use desktop::{Desktop, PowerState, StaticDesktop};
pub use ease::Easing;
pub use error::{Error, Result};
pub use observer::{Outcome, TransitionObserver};
pub use window::{VirtualWindow, WindowHandle, WindowId, WindowOp};
