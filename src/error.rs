//! Structured error types for gridcore.
//!
//! Only usage errors surface here. Out-of-range coordinates are answered with
//! sentinels (`-1`, `None`) and a vetoed selection change is a plain `false`.

/// All errors that can be reported by the grid core.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// An argument had the wrong shape (fractional coordinate, non-finite
    /// point, negative viewport size, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid A1-style cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Grid options could not be deserialized.
    #[error("Invalid grid options: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
