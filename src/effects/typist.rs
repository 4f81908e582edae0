//! Timed text typist.
//!
//! Cycles through an ordered list of phrases, revealing one character every `speed`,
//! holding the full phrase for `pause`, then deleting one character every `speed / 2`
//! before moving on to the next phrase (wrapping after the last).

use std::time::Duration;

use crate::{
    foundation::error::{FxError, FxResult},
    schedule::{
        lifecycle::Effect,
        timers::{Scheduler, TimerId},
    },
};

fn default_speed() -> Duration {
    Duration::from_millis(85)
}

fn default_pause() -> Duration {
    Duration::from_millis(1800)
}

/// Typist configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypistConfig {
    /// Phrases, in display order. Must not be empty.
    pub phrases: Vec<String>,
    /// Delay between typed characters. Deleting runs at twice this rate.
    #[serde(with = "crate::foundation::core::serde_ms", default = "default_speed")]
    pub speed: Duration,
    /// Hold time once a phrase is fully typed.
    #[serde(with = "crate::foundation::core::serde_ms", default = "default_pause")]
    pub pause: Duration,
}

impl TypistConfig {
    /// Config with the default cadence (85 ms per character, 1.8 s hold).
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            speed: default_speed(),
            pause: default_pause(),
        }
    }

    /// Reject configurations that would stall or spin the typist.
    pub fn validate(&self) -> FxResult<()> {
        if self.phrases.is_empty() {
            return Err(FxError::validation("typist needs at least one phrase"));
        }
        if self.speed.is_zero() {
            return Err(FxError::validation("typist speed must be > 0"));
        }
        Ok(())
    }
}

/// Which leg of the cycle the typist is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypistPhase {
    /// Revealing characters.
    #[default]
    Typing,
    /// Holding the full phrase.
    Paused,
    /// Removing characters.
    Deleting,
}

/// Pure typewriter state; advanced one transition at a time by [`TypistState::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TypistState {
    /// Index into the phrase list.
    pub phrase_index: usize,
    /// Characters of the current phrase currently shown.
    pub char_count: usize,
    /// Set while characters are being removed.
    pub deleting: bool,
    /// Current leg of the cycle.
    pub phase: TypistPhase,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn char_prefix(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

impl TypistState {
    /// The text to display: the first `char_count` characters of the current phrase.
    pub fn display<'a>(&self, phrases: &'a [String]) -> &'a str {
        phrases
            .get(self.phrase_index)
            .map_or("", |p| char_prefix(p, self.char_count))
    }

    /// Apply one transition and return the delay until the next one.
    ///
    /// With no phrases there is nothing to type: the state is left alone and `speed` is
    /// returned.
    pub fn step(&mut self, phrases: &[String], speed: Duration, pause: Duration) -> Duration {
        if phrases.is_empty() {
            return speed;
        }
        let len = phrases.get(self.phrase_index).map_or(0, |p| char_len(p));
        match self.phase {
            TypistPhase::Typing => {
                if self.char_count < len {
                    self.char_count += 1;
                }
                if self.char_count >= len {
                    self.char_count = len;
                    self.phase = TypistPhase::Paused;
                    pause
                } else {
                    speed
                }
            }
            TypistPhase::Paused => {
                self.deleting = true;
                self.phase = TypistPhase::Deleting;
                speed / 2
            }
            TypistPhase::Deleting => {
                self.char_count = self.char_count.saturating_sub(1);
                if self.char_count == 0 {
                    self.deleting = false;
                    self.phase = TypistPhase::Typing;
                    self.phrase_index = (self.phrase_index + 1) % phrases.len();
                    speed
                } else {
                    speed / 2
                }
            }
        }
    }
}

/// Timer payload; the typist only ever has one tick outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypistTick;

/// Timer-driven typist bound to one text display.
#[derive(Clone, Debug)]
pub struct Typist {
    config: TypistConfig,
    state: TypistState,
    timers: Scheduler<TypistTick>,
}

impl Typist {
    /// Validate `config` and build an idle typist showing an empty string.
    #[tracing::instrument(skip(config), fields(phrases = config.phrases.len()))]
    pub fn new(config: TypistConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TypistState::default(),
            timers: Scheduler::new("typist"),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &TypistConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> TypistState {
        self.state
    }

    /// Current display string.
    pub fn display(&self) -> &str {
        self.state.display(&self.config.phrases)
    }

    /// The outstanding tick, if the typist is running.
    pub fn pending_tick(&self) -> Option<TimerId> {
        self.timers.pending_ids().first().copied()
    }

    /// Apply every tick due at or before `now`, in order.
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.apply(fired.due);
        }
    }

    /// Force one specific tick regardless of its deadline.
    ///
    /// Returns whether anything happened; a cancelled tick (for example after
    /// [`Effect::teardown`]) is ignored.
    pub fn fire(&mut self, id: TimerId) -> bool {
        match self.timers.take(id) {
            Some(fired) => {
                self.apply(fired.due);
                true
            }
            None => {
                tracing::debug!(?id, "typist tick ignored: not pending");
                false
            }
        }
    }

    fn apply(&mut self, due: Duration) {
        let delay = self
            .state
            .step(&self.config.phrases, self.config.speed, self.config.pause);
        // The next tick is armed only after this transition has committed.
        self.timers.arm(due + delay, TypistTick);
    }
}

impl Effect for Typist {
    fn start(&mut self, now: Duration) {
        self.timers.stop();
        self.timers.resume();
        self.state = TypistState::default();
        self.timers.arm(now + self.config.speed, TypistTick);
        tracing::debug!(?now, "typist started");
    }

    fn stop(&mut self) {
        self.timers.stop();
    }

    fn is_running(&self) -> bool {
        self.timers.pending_len() > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/typist.rs"]
mod tests;
