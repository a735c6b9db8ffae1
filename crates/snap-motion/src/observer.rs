//! Instrumentation hooks for the transition controller.

use snap_geom::{Rect, WindowTransition};

/// How a dequeued transition ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// Nothing to do: no target, or already there.
    Skipped,
    /// The window reached the target after `attempts` extra applies.
    Converged {
        /// Retries needed after the animation.
        attempts: u32,
    },
    /// The retry budget ran out; `last` is the last frame read back.
    Abandoned {
        /// Last observed frame, if it could be read.
        last: Option<Rect>,
    },
    /// A later transition resolved while this one was animating and took
    /// over the animation from the current interim frame.
    Superseded {
        /// Sequence number of the transition that took over.
        by: u64,
    },
    /// The controller shut down mid-transition.
    Cancelled,
}

/// Receives controller progress. All methods default to no-ops.
pub trait TransitionObserver: Send + Sync {
    /// A transition was resolved starting from `from`.
    ///
    /// `transition` is the transition as resolved, including any live-edge
    /// enrichment. `target` is `None` when nothing applies.
    fn on_resolved(
        &self,
        _seq: u64,
        _transition: &WindowTransition,
        _from: Rect,
        _target: Option<Rect>,
    ) {
    }

    /// A transition finished.
    fn on_settled(&self, _seq: u64, _outcome: &Outcome) {}
}
