use std::time::Duration;

use crate::foundation::{
    core::duration_from_ms,
    error::{FxError, FxResult},
};

/// One discrete input from the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer click at viewport coordinates.
    Click {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Key press, as a `KeyboardEvent.key` value.
    Key {
        /// Key code.
        code: String,
    },
    /// Viewport size change.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
}

/// An input stamped with the host time it arrives at, for scripted playback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedInput {
    /// Milliseconds since mount.
    pub at_ms: f64,
    /// The input.
    #[serde(flatten)]
    pub event: InputEvent,
}

impl TimedInput {
    /// Arrival time as a [`Duration`].
    pub fn at(&self) -> FxResult<Duration> {
        duration_from_ms(self.at_ms)
    }
}

/// Parse a JSON array of timed inputs and sort it by arrival time (stable for ties).
pub fn parse_script(json: &str) -> FxResult<Vec<TimedInput>> {
    let mut script: Vec<TimedInput> = serde_json::from_str(json)
        .map_err(|e| FxError::config(format!("parse input script JSON: {e}")))?;
    for input in &script {
        input.at()?;
    }
    script.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    Ok(script)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/input.rs"]
mod tests;
