//! Boot-screen intro: reveals a short script line by line, then reports done.
//!
//! Each line appears one `step` after the previous one; the last line takes `last_step`.
//! Once every line is visible the sequence waits `done_delay` and flips to done.

use std::time::Duration;

use crate::{
    foundation::error::{FxError, FxResult},
    schedule::{
        lifecycle::Effect,
        timers::{Scheduler, TimerId},
    },
};

fn default_step() -> Duration {
    Duration::from_millis(380)
}

fn default_last_step() -> Duration {
    Duration::from_millis(600)
}

fn default_done_delay() -> Duration {
    Duration::from_millis(400)
}

/// Boot script and its timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BootConfig {
    /// Lines to reveal, in order. Must not be empty.
    pub lines: Vec<String>,
    /// Delay before each line except the last.
    #[serde(with = "crate::foundation::core::serde_ms", default = "default_step")]
    pub step: Duration,
    /// Delay before the last line.
    #[serde(with = "crate::foundation::core::serde_ms", default = "default_last_step")]
    pub last_step: Duration,
    /// Hold after the last line before the sequence reports done.
    #[serde(with = "crate::foundation::core::serde_ms", default = "default_done_delay")]
    pub done_delay: Duration,
}

impl BootConfig {
    /// Script with the default 380 / 600 / 400 ms timing.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            step: default_step(),
            last_step: default_last_step(),
            done_delay: default_done_delay(),
        }
    }

    /// Reject an empty script.
    pub fn validate(&self) -> FxResult<()> {
        if self.lines.is_empty() {
            return Err(FxError::validation("boot script needs at least one line"));
        }
        Ok(())
    }

    /// Total time from start until done.
    pub fn total(&self) -> Duration {
        let n = u32::try_from(self.lines.len()).unwrap_or(u32::MAX);
        self.step.saturating_mul(n.saturating_sub(1)) + self.last_step + self.done_delay
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BootTick {
    Reveal,
    Done,
}

/// What the intro screen shows at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BootSnapshot {
    /// Revealed lines, oldest first.
    pub lines: Vec<String>,
    /// Revealed fraction of the script, in `[0, 1]`.
    pub progress: f64,
    /// Whether the intro has finished.
    pub done: bool,
}

/// Timer-driven boot intro.
#[derive(Clone, Debug)]
pub struct BootSequence {
    config: BootConfig,
    revealed: usize,
    done: bool,
    timers: Scheduler<BootTick>,
}

impl BootSequence {
    /// Validate `config` and build an idle sequence with nothing revealed.
    #[tracing::instrument(skip(config), fields(lines = config.lines.len()))]
    pub fn new(config: BootConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            revealed: 0,
            done: false,
            timers: Scheduler::new("boot"),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Lines revealed so far.
    pub fn visible_lines(&self) -> &[String] {
        &self.config.lines[..self.revealed]
    }

    /// Revealed fraction, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.revealed as f64 / self.config.lines.len() as f64
    }

    /// Whether the intro has finished.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The outstanding timer, if any.
    pub fn pending_tick(&self) -> Option<TimerId> {
        self.timers.pending_ids().first().copied()
    }

    /// Owned copy of what is on screen.
    pub fn snapshot(&self) -> BootSnapshot {
        BootSnapshot {
            lines: self.visible_lines().to_vec(),
            progress: self.progress(),
            done: self.done,
        }
    }

    /// Apply every tick due at or before `now`. Returns whether the sequence finished
    /// during this call.
    pub fn advance(&mut self, now: Duration) -> bool {
        let was_done = self.done;
        while let Some(fired) = self.timers.pop_due(now) {
            self.apply(fired.event, fired.due);
        }
        !was_done && self.done
    }

    /// Force one specific tick. Returns whether it was still pending.
    pub fn fire(&mut self, id: TimerId) -> bool {
        match self.timers.take(id) {
            Some(fired) => {
                self.apply(fired.event, fired.due);
                true
            }
            None => false,
        }
    }

    fn delay_before_next_line(&self) -> Duration {
        if self.revealed + 1 == self.config.lines.len() {
            self.config.last_step
        } else {
            self.config.step
        }
    }

    fn apply(&mut self, tick: BootTick, due: Duration) {
        match tick {
            BootTick::Reveal => {
                self.revealed = (self.revealed + 1).min(self.config.lines.len());
                if self.revealed < self.config.lines.len() {
                    let delay = self.delay_before_next_line();
                    self.timers.arm(due + delay, BootTick::Reveal);
                } else {
                    self.timers.arm(due + self.config.done_delay, BootTick::Done);
                }
            }
            BootTick::Done => {
                self.done = true;
                tracing::debug!(?due, "boot sequence done");
            }
        }
    }
}

impl Effect for BootSequence {
    fn start(&mut self, now: Duration) {
        self.timers.stop();
        self.timers.resume();
        self.revealed = 0;
        self.done = false;
        let delay = self.delay_before_next_line();
        self.timers.arm(now + delay, BootTick::Reveal);
    }

    fn stop(&mut self) {
        self.timers.stop();
    }

    fn is_running(&self) -> bool {
        self.timers.pending_len() > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/boot.rs"]
mod tests;
