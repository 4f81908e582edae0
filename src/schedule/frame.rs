//! requestAnimationFrame-style frame chain.
//!
//! A [`FrameLoop`] holds at most one outstanding frame request. Delivering a frame consumes
//! that request and, while the loop runs, immediately requests the next one, so there is
//! never more than one callback in flight and a stopped loop has nothing left to deliver.

use std::time::Duration;

/// Nominal display refresh the per-frame tuning constants were written against.
pub const REFERENCE_FRAME: Duration = Duration::from_nanos(16_666_667);

/// One delivered animation frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameTick {
    /// Monotonically increasing frame counter since the loop was created.
    pub index: u64,
    /// Host timestamp for this frame.
    pub now: Duration,
    /// Time since the previous delivered frame, clamped to the loop's `max_delta`.
    /// Zero on the first frame after `start`.
    pub delta: Duration,
}

impl FrameTick {
    /// `delta` expressed in reference frames (1.0 at 60 Hz).
    pub fn reference_frames(&self) -> f64 {
        self.delta.as_secs_f64() / REFERENCE_FRAME.as_secs_f64()
    }
}

/// A frame callback chain that can be started, stopped and restarted.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    running: bool,
    /// A frame request is outstanding. Set exactly while the chain is armed.
    pending: bool,
    frame_counter: u64,
    last: Option<Duration>,
    max_delta: Duration,
}

impl FrameLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(max_delta: Duration) -> Self {
        Self {
            running: false,
            pending: false,
            frame_counter: 0,
            last: None,
            max_delta,
        }
    }

    /// Starts the chain. If already running, this is a no-op.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last = None;
        self.pending = true;
    }

    /// Stops the chain and cancels the outstanding request. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending = false;
    }

    /// Returns `true` if the loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a frame request is outstanding.
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Deliver a frame at host time `now`.
    ///
    /// Returns `None` when the loop is stopped or has no outstanding request; such a call
    /// changes nothing.
    pub fn on_frame(&mut self, now: Duration) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        if !std::mem::take(&mut self.pending) {
            return None;
        }

        let delta = match self.last {
            Some(prev) => now.saturating_sub(prev).min(self.max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let index = self.frame_counter;
        self.frame_counter += 1;

        self.pending = true;
        Some(FrameTick { index, now, delta })
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/frame.rs"]
mod tests;
