use thiserror::Error;

const DEFAULT_MESSAGE: &str = "Assertion failed!";

/// An internal invariant did not hold. Always a bug in this crate, never a
/// caller error; callers should treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returns `Err(AssertionFailure)` when `cond` is false.
///
/// `text` becomes the failure message; `None` falls back to
/// `"Assertion failed!"`.
pub fn assert_or_die(cond: bool, text: Option<&str>) -> Result<(), AssertionFailure> {
    if cond {
        return Ok(());
    }
    Err(AssertionFailure::new(text.unwrap_or(DEFAULT_MESSAGE)))
}
