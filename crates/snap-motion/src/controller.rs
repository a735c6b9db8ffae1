//! Serialized, cancellable execution of window transitions.
//!
//! A [`TransitionController`] owns one window. Submitted transitions queue up
//! and are drained by a single background task that is started on demand and
//! exits when the queue is empty. Each transition resolves against the most
//! recent in-flight target, so rapid submissions compose on the frame the
//! previous transition is heading to rather than on the lagging real frame.
//!
//! Queued transitions are resolved on every animation tick. When one yields a
//! target, it takes over the running animation from the current interim
//! frame and the transition it replaces settles as
//! [`Outcome::Superseded`].
//!
//! Shared state is limited to the queue with its draining flag, the in-flight
//! target slot and the configuration. Lock order is queue before target.

use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::{Mutex, RwLock};
use snap_geom::{Axis, Breakpoint, Rect, Screen, WindowCoordinates, WindowTransition};
use tokio::{
    sync::watch,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    clock::{Clock, TokioClock},
    config::ControllerCfg,
    desktop::Desktop,
    error::{Error, Result},
    observer::{Outcome, TransitionObserver},
    window::WindowHandle,
};

/// Frames closer than this (pixels) count as unchanged.
const SAME_FRAME_EPS: f64 = 0.5;

/// Externally visible controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No drain task is running.
    Idle,
    /// Resolving queued transitions.
    Draining,
    /// Interpolating towards a target.
    Animating,
    /// Re-applying a target the window has not reached.
    Retrying,
}

struct Queued {
    seq: u64,
    transition: WindowTransition,
}

/// A resolved transition being driven towards its target.
struct Segment {
    seq: u64,
    from: Rect,
    target: Rect,
    cfg: ControllerCfg,
}

#[derive(Default)]
struct Pending {
    queue: VecDeque<Queued>,
    draining: bool,
}

struct Inner<D> {
    window: Arc<dyn WindowHandle>,
    desktop: Arc<D>,
    clock: RwLock<Arc<dyn Clock>>,
    observer: RwLock<Option<Arc<dyn TransitionObserver>>>,
    cfg: RwLock<ControllerCfg>,
    pending: Mutex<Pending>,
    in_flight: Mutex<Option<Rect>>,
    last_kind: Mutex<Option<&'static str>>,
    seq: AtomicU64,
    cancel: CancellationToken,
    state: watch::Sender<ControllerState>,
}

/// Drives one window through a FIFO of transitions.
pub struct TransitionController<D: Desktop + 'static> {
    inner: Arc<Inner<D>>,
}

impl<D: Desktop + 'static> TransitionController<D> {
    /// Controller for `window` on `desktop`.
    pub fn new(window: Arc<dyn WindowHandle>, desktop: Arc<D>, cfg: ControllerCfg) -> Self {
        let (state, _) = watch::channel(ControllerState::Idle);
        Self {
            inner: Arc::new(Inner {
                window,
                desktop,
                clock: RwLock::new(Arc::new(TokioClock)),
                observer: RwLock::new(None),
                cfg: RwLock::new(cfg),
                pending: Mutex::new(Pending::default()),
                in_flight: Mutex::new(None),
                last_kind: Mutex::new(None),
                seq: AtomicU64::new(0),
                cancel: CancellationToken::new(),
                state,
            }),
        }
    }

    /// Use `clock` to measure animation progress.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        *self.inner.clock.write() = clock;
        self
    }

    /// Report progress to `observer`.
    pub fn with_observer(self, observer: Arc<dyn TransitionObserver>) -> Self {
        *self.inner.observer.write() = Some(observer);
        self
    }

    /// Queue `transition` and return its sequence number.
    ///
    /// Starts the drain task if none is running. Must be called within a
    /// tokio runtime. After [`TransitionController::shutdown`] submissions
    /// are dropped.
    pub fn submit(&self, transition: WindowTransition) -> u64 {
        let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let kind = transition.kind();
        if self.inner.cancel.is_cancelled() {
            debug!(seq, kind, "transition_dropped_after_shutdown");
            return seq;
        }
        let start = {
            let mut p = self.inner.pending.lock();
            p.queue.push_back(Queued { seq, transition });
            if p.draining {
                false
            } else {
                p.draining = true;
                self.inner.state.send_replace(ControllerState::Draining);
                true
            }
        };
        trace!(seq, kind, start, "transition_enqueued");
        if start {
            let inner = self.inner.clone();
            tokio::spawn(async move { inner.drain().await });
        }
        seq
    }

    /// Drop all queued transitions. The in-flight transition continues.
    pub fn cancel_pending(&self) -> usize {
        let dropped = {
            let mut p = self.inner.pending.lock();
            let n = p.queue.len();
            p.queue.clear();
            n
        };
        debug!(dropped, "pending_cancelled");
        dropped
    }

    /// Stop the drain task promptly and refuse further work.
    pub fn shutdown(&self) {
        self.cancel_pending();
        self.inner.cancel.cancel();
        debug!("controller_shutdown");
    }

    /// Snapshot of the configuration.
    pub fn config(&self) -> ControllerCfg {
        self.inner.cfg.read().clone()
    }

    /// Replace the configuration; takes effect from the next transition.
    pub fn set_config(&self, cfg: ControllerCfg) {
        *self.inner.cfg.write() = cfg;
    }

    /// Current phase.
    pub fn state(&self) -> ControllerState {
        *self.inner.state.borrow()
    }

    /// Watch phase changes.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.inner.state.subscribe()
    }

    /// Wait until the drain task has exited.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.state.subscribe();
        rx.wait_for(|s| *s == ControllerState::Idle).await.ok();
    }

    /// Number of queued, not yet started transitions.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().queue.len()
    }

    /// Target frame of the transition being executed, if any.
    pub fn in_flight_target(&self) -> Option<Rect> {
        *self.inner.in_flight.lock()
    }
}

impl<D: Desktop + 'static> Drop for TransitionController<D> {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl<D: Desktop + 'static> Inner<D> {
    fn set_state(&self, state: ControllerState) {
        self.state.send_replace(state);
    }

    fn observer(&self) -> Option<Arc<dyn TransitionObserver>> {
        self.observer.read().clone()
    }

    fn settled(&self, seq: u64, outcome: &Outcome) {
        debug!(seq, ?outcome, "transition_settled");
        if let Some(obs) = self.observer() {
            obs.on_settled(seq, outcome);
        }
    }

    /// Pop the next transition, or mark the controller idle.
    fn next(&self) -> Option<Queued> {
        let mut p = self.pending.lock();
        if !self.cancel.is_cancelled()
            && let Some(q) = p.queue.pop_front()
        {
            return Some(q);
        }
        p.queue.clear();
        p.draining = false;
        *self.in_flight.lock() = None;
        self.set_state(ControllerState::Idle);
        None
    }

    /// Pop the next transition without changing the drain state.
    fn pop(&self) -> Option<Queued> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.pending.lock().queue.pop_front()
    }

    async fn drain(self: Arc<Self>) {
        debug!("drain_start");
        while let Some(item) = self.next() {
            self.set_state(ControllerState::Draining);
            if let Some(segment) = self.resolve(&item).await {
                self.run(segment).await;
            }
        }
        debug!("drain_stop");
    }

    /// Await `fut` unless the controller is cancelled first.
    async fn guarded<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            r = fut => r,
        }
    }

    /// Apply a frame as two independent size and position requests.
    async fn apply(&self, frame: Rect) -> Result<()> {
        self.guarded(self.window.set_size(frame.size())).await?;
        self.guarded(self.window.set_position(frame.origin())).await
    }

    /// Merge edges of the other visible windows on `screen` into the
    /// breakpoints.
    fn enrich(
        &self,
        transition: &WindowTransition,
        screen: &D::Screen,
        tolerance: f64,
    ) -> WindowTransition {
        let Some(base) = transition.breakpoints() else {
            return transition.clone();
        };
        let own = self.window.id();
        let mut extra = Vec::new();
        for (id, frame) in self.desktop.visible_windows() {
            if id == own || self.desktop.screen_containing(&frame).as_ref() != Some(screen) {
                continue;
            }
            let c = WindowCoordinates::from_window_frame(&frame, screen, &*self.desktop);
            for axis in transition.axes() {
                let (lo, hi) = match axis {
                    Axis::X => (c.x, c.max_x()),
                    Axis::Y => (c.y, c.max_y()),
                };
                for value in [lo, hi] {
                    extra.push(Breakpoint::new(*axis, value).with_source(format!("window {id}")));
                }
            }
        }
        let merged = base.merge(extra).with_tolerance(tolerance);
        trace!(before = base.len(), after = merged.len(), "breakpoints_enriched");
        transition.with_breakpoints(merged)
    }

    /// Resolve `item` against the in-flight target, or the window's frame
    /// when nothing is in flight.
    ///
    /// Transitions without a target settle here and yield `None`.
    async fn resolve(&self, item: &Queued) -> Option<Segment> {
        let seq = item.seq;
        let cfg = self.cfg.read().clone();
        let kind = item.transition.kind();
        let previous = self.last_kind.lock().replace(kind);

        let in_flight = *self.in_flight.lock();
        let current = match in_flight {
            Some(r) => r,
            None => match self.guarded(self.window.frame()).await {
                Ok(r) => r,
                Err(Error::Cancelled) => {
                    self.settled(seq, &Outcome::Cancelled);
                    return None;
                }
                Err(e) => {
                    warn!(seq, error = %e, "frame_read_failed");
                    self.settled(seq, &Outcome::Skipped);
                    return None;
                }
            },
        };

        let Some(screen) = self.desktop.screen_containing(&current) else {
            debug!(seq, kind, "no_screen");
            self.settled(seq, &Outcome::Skipped);
            return None;
        };

        let transition = if cfg.context_aware_grid.applies(kind, previous) {
            self.enrich(&item.transition, &screen, cfg.grid_tolerance)
        } else {
            item.transition.clone()
        };

        let target = transition
            .rect(&current, &screen, &*self.desktop)
            .filter(|t| !t.approx_eq(&current, SAME_FRAME_EPS));
        debug!(
            seq,
            kind,
            screen = %screen.name(),
            from = %current,
            target = ?target,
            "transition_resolved"
        );
        if let Some(obs) = self.observer() {
            obs.on_resolved(seq, &transition, current, target);
        }
        let Some(target) = target else {
            self.settled(seq, &Outcome::Skipped);
            return None;
        };
        *self.in_flight.lock() = Some(target);
        Some(Segment {
            seq,
            from: current,
            target,
            cfg,
        })
    }

    /// Resolve queued transitions until one yields a target. It replaces
    /// `current` and starts from the interim frame `from`.
    async fn take_over(&self, current: &Segment, from: Rect) -> Option<Segment> {
        while let Some(item) = self.pop() {
            if let Some(next) = self.resolve(&item).await {
                self.settled(current.seq, &Outcome::Superseded { by: next.seq });
                return Some(Segment { from, ..next });
            }
        }
        None
    }

    /// Drive `segment` to its target with enhanced UI suspended, then settle
    /// whichever transition finished the animation.
    async fn run(&self, mut segment: Segment) {
        let enhanced = match self.guarded(self.window.enhanced_ui()).await {
            Ok(v) => v,
            Err(Error::Cancelled) => {
                self.settled(segment.seq, &Outcome::Cancelled);
                return;
            }
            Err(e) => {
                debug!(error = %e, "enhanced_ui_query_failed");
                false
            }
        };
        if enhanced && let Err(e) = self.guarded(self.window.set_enhanced_ui(false)).await {
            debug!(error = %e, "enhanced_ui_disable_failed");
        }

        let outcome = match self.animate(&mut segment).await {
            Ok(()) => self.settle(segment.target, &segment.cfg).await,
            Err(_) => Outcome::Cancelled,
        };

        if enhanced && let Err(e) = self.window.set_enhanced_ui(true).await {
            warn!(error = %e, "enhanced_ui_restore_failed");
        }
        self.settled(segment.seq, &outcome);
    }

    /// Move along `segment`, switching to later transitions as they resolve.
    ///
    /// Only cancellation is an error. The tick rate of the first segment is
    /// kept for the whole chain.
    async fn animate(&self, segment: &mut Segment) -> Result<()> {
        self.set_state(ControllerState::Animating);
        let power = self.desktop.power();
        let Some(mut duration) = segment.cfg.animation.effective_duration(power) else {
            trace!(to = %segment.target, "apply_direct");
            return self.apply_logged(segment.target).await;
        };

        let clock = self.clock.read().clone();
        let mut ticker = time::interval(segment.cfg.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut started = None;
        let mut last = segment.from;
        let mut frames = 0u32;
        debug!(
            seq = segment.seq,
            from = %segment.from,
            to = %segment.target,
            duration_ms = duration.as_millis(),
            "animation_start"
        );
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(frames, "animation_cancelled");
                    return Err(Error::Cancelled);
                }
                _ = ticker.tick() => {}
            }
            if let Some(next) = self.take_over(segment, last).await {
                *segment = next;
                started = None;
                debug!(seq = segment.seq, from = %last, to = %segment.target, "animation_retarget");
                match segment.cfg.animation.effective_duration(power) {
                    Some(d) => duration = d,
                    None => break,
                }
            }
            let now = clock.now();
            let t0 = *started.get_or_insert(now);
            let progress = now.saturating_duration_since(t0).as_secs_f64() / duration.as_secs_f64();
            if progress >= 1.0 {
                break;
            }
            let eased = segment.cfg.easing.apply(progress);
            let frame = segment.from.lerp(&segment.target, eased).round();
            self.apply_logged(frame).await?;
            last = frame;
            frames += 1;
        }
        debug!(frames, "animation_finish");
        self.apply_logged(segment.target).await
    }

    /// Apply, absorbing handle failures so convergence can retry.
    async fn apply_logged(&self, frame: Rect) -> Result<()> {
        match self.apply(frame).await {
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(e) => {
                debug!(%frame, error = %e, "apply_failed");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Verify the window reached `target`, re-applying a bounded number of times.
    async fn settle(&self, target: Rect, cfg: &ControllerCfg) -> Outcome {
        let mut attempts = 0;
        loop {
            let last = match self.guarded(self.window.frame()).await {
                Ok(actual) if actual.approx_eq(&target, cfg.verify_eps) => {
                    return Outcome::Converged { attempts };
                }
                Ok(actual) => Some(actual),
                Err(Error::Cancelled) => return Outcome::Cancelled,
                Err(e) => {
                    debug!(error = %e, "frame_read_failed");
                    None
                }
            };
            if attempts >= cfg.max_retries {
                warn!(%target, last = ?last, attempts, "convergence_abandoned");
                return Outcome::Abandoned { last };
            }
            attempts += 1;
            self.set_state(ControllerState::Retrying);
            debug!(%target, last = ?last, attempt = attempts, "convergence_retry");
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Outcome::Cancelled,
                _ = time::sleep(cfg.retry_delay()) => {}
            }
            if self.apply_logged(target).await.is_err() {
                return Outcome::Cancelled;
            }
        }
    }
}
