//! Fixed-length input sequence matcher.
//!
//! Keeps a single progress index into the target. A matching input advances it; any other
//! input resets it to 0 without re-checking that input against the first code. Reaching the
//! end fires once and resets.

use crate::foundation::error::{FxError, FxResult};

/// The classic directional-key unlock, as browser `KeyboardEvent.key` values.
pub const KONAMI: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Linear matcher over a non-empty target sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceMatcher<K = String> {
    target: Vec<K>,
    progress: usize,
    fired: u64,
}

impl SequenceMatcher<String> {
    /// Matcher for [`KONAMI`].
    pub fn konami() -> Self {
        Self {
            target: KONAMI.iter().map(|k| (*k).to_owned()).collect(),
            progress: 0,
            fired: 0,
        }
    }
}

impl<K: PartialEq> SequenceMatcher<K> {
    /// Matcher for `target`, which must not be empty.
    pub fn new(target: Vec<K>) -> FxResult<Self> {
        if target.is_empty() {
            return Err(FxError::validation("unlock sequence must not be empty"));
        }
        Ok(Self {
            target,
            progress: 0,
            fired: 0,
        })
    }

    /// Target sequence.
    pub fn target(&self) -> &[K] {
        &self.target
    }

    /// Feed one input. Returns `true` exactly when it completes the sequence.
    pub fn feed<Q>(&mut self, input: &Q) -> bool
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        if self.target[self.progress] == *input {
            self.progress += 1;
        } else {
            self.progress = 0;
            return false;
        }
        if self.progress == self.target.len() {
            self.progress = 0;
            self.fired += 1;
            return true;
        }
        false
    }

    /// Number of leading codes matched so far.
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Forget any partial match.
    pub fn reset(&mut self) {
        self.progress = 0;
    }

    /// How many times the sequence has completed.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sequence.rs"]
mod tests;
