/// Convenience result type used across afterglow.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only configuration problems surface through this type. Runtime hiccups of a running
/// effect (zero-size viewport, a tick arriving after teardown, a full pool) are absorbed
/// where they happen and logged instead.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// A precondition on user-provided configuration does not hold.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or decoded.
    #[error("config error: {0}")]
    Config(String),

    /// A rendering surface refused a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
