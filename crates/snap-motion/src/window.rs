//! Window handle abstraction and an in-memory implementation.
//!
//! Size and position are set by two independent calls; there is no combined
//! setter. Handles may clamp, ignore or fail requests, so callers verify by
//! reading the frame back.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use snap_geom::{Point, Rect, Size};
use tokio::time;

use crate::error::{Error, Result};

/// Identifier of a window on the desktop.
pub type WindowId = u32;

/// A window whose frame can be read and changed.
///
/// Frames are in window space (top-left origin of the primary screen).
#[async_trait]
pub trait WindowHandle: Send + Sync {
    /// Stable identifier.
    fn id(&self) -> WindowId;

    /// Current frame.
    async fn frame(&self) -> Result<Rect>;

    /// Request a new size, keeping the origin.
    async fn set_size(&self, size: Size) -> Result<()>;

    /// Request a new origin, keeping the size.
    async fn set_position(&self, origin: Point) -> Result<()>;

    /// Whether the owning application runs in enhanced UI mode.
    async fn enhanced_ui(&self) -> Result<bool>;

    /// Switch the owning application's enhanced UI mode.
    async fn set_enhanced_ui(&self, enabled: bool) -> Result<()>;
}

/// A mutation recorded by [`VirtualWindow`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowOp {
    /// `set_size` was called.
    SetSize(Size),
    /// `set_position` was called.
    SetPosition(Point),
    /// `set_enhanced_ui` was called.
    SetEnhancedUi(bool),
}

/// In-memory window used by tests and the simulator.
#[derive(Clone)]
pub struct VirtualWindow {
    id: WindowId,
    frame: Arc<Mutex<Rect>>,
    min_size: Arc<Mutex<Option<Size>>>,
    latency: Arc<Mutex<Option<Duration>>>,
    ignore_sets: Arc<AtomicBool>,
    fail_sets: Arc<AtomicBool>,
    enhanced_ui: Arc<AtomicBool>,
    ops: Arc<Mutex<Vec<WindowOp>>>,
    history: Arc<Mutex<Vec<Rect>>>,
}

impl VirtualWindow {
    /// Window `id` starting at `frame`.
    pub fn new(id: WindowId, frame: Rect) -> Self {
        Self {
            id,
            frame: Arc::new(Mutex::new(frame)),
            min_size: Arc::new(Mutex::new(None)),
            latency: Arc::new(Mutex::new(None)),
            ignore_sets: Arc::new(AtomicBool::new(false)),
            fail_sets: Arc::new(AtomicBool::new(false)),
            enhanced_ui: Arc::new(AtomicBool::new(false)),
            ops: Arc::new(Mutex::new(Vec::new())),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Clamp requested sizes to at least `size`.
    pub fn set_min_size(&self, size: Option<Size>) {
        *self.min_size.lock() = size;
    }

    /// Delay every mutation by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Accept but ignore all frame mutations.
    pub fn set_ignore_sets(&self, v: bool) {
        self.ignore_sets.store(v, Ordering::SeqCst);
    }

    /// Fail all frame mutations.
    pub fn set_fail_sets(&self, v: bool) {
        self.fail_sets.store(v, Ordering::SeqCst);
    }

    /// Set the enhanced UI flag without recording an operation.
    pub fn preset_enhanced_ui(&self, v: bool) {
        self.enhanced_ui.store(v, Ordering::SeqCst);
    }

    /// Current frame without going through the async API.
    pub fn current(&self) -> Rect {
        *self.frame.lock()
    }

    /// All mutations in call order.
    pub fn ops(&self) -> Vec<WindowOp> {
        self.ops.lock().clone()
    }

    /// Frame after every accepted mutation.
    pub fn history(&self) -> Vec<Rect> {
        self.history.lock().clone()
    }

    /// Number of `set_size` calls.
    pub fn size_calls(&self) -> usize {
        self.ops
            .lock()
            .iter()
            .filter(|op| matches!(op, WindowOp::SetSize(_)))
            .count()
    }

    async fn delay(&self) {
        let latency = *self.latency.lock();
        if let Some(d) = latency {
            time::sleep(d).await;
        }
    }

    fn note(&self, op: WindowOp) {
        self.ops.lock().push(op);
    }

    /// Record `op` and apply `f` unless mutations are ignored or failing.
    fn mutate<F>(&self, op: WindowOp, f: F) -> Result<()>
    where
        F: FnOnce(&mut Rect),
    {
        self.note(op);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(Error::Window(format!("window {} rejected {op:?}", self.id)));
        }
        if self.ignore_sets.load(Ordering::SeqCst) {
            return Ok(());
        }
        let mut frame = self.frame.lock();
        f(&mut frame);
        self.history.lock().push(*frame);
        Ok(())
    }
}

#[async_trait]
impl WindowHandle for VirtualWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    async fn frame(&self) -> Result<Rect> {
        Ok(self.current())
    }

    async fn set_size(&self, size: Size) -> Result<()> {
        self.delay().await;
        let min = *self.min_size.lock();
        self.mutate(WindowOp::SetSize(size), |frame| {
            let (w, h) = match min {
                Some(m) => (size.width.max(m.width), size.height.max(m.height)),
                None => (size.width, size.height),
            };
            frame.w = w;
            frame.h = h;
        })
    }

    async fn set_position(&self, origin: Point) -> Result<()> {
        self.delay().await;
        self.mutate(WindowOp::SetPosition(origin), |frame| {
            frame.x = origin.x;
            frame.y = origin.y;
        })
    }

    async fn enhanced_ui(&self) -> Result<bool> {
        Ok(self.enhanced_ui.load(Ordering::SeqCst))
    }

    async fn set_enhanced_ui(&self, enabled: bool) -> Result<()> {
        self.note(WindowOp::SetEnhancedUi(enabled));
        self.enhanced_ui.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}
