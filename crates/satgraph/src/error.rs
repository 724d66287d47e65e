//! Error types for satgraph

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SatVisError {
    /// An invariant of the derivation graph or of the event stream does not hold.
    #[error("Assertion failed: {0}")]
    Consistency(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SatVisError {
    pub fn consistency(message: impl Into<String>) -> Self {
        SatVisError::Consistency(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        SatVisError::Parse(message.into())
    }

    /// True for the internal-consistency kind, which callers surface as a failure state.
    pub fn is_consistency(&self) -> bool {
        matches!(self, SatVisError::Consistency(_))
    }
}

pub type Result<T> = std::result::Result<T, SatVisError>;

/// Return a consistency error from the enclosing function unless `cond` holds.
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::SatVisError::Consistency(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure;
