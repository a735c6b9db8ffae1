use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the geometry crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised while decoding geometry and transition data.
///
/// Resolution failures are not errors: a transition that cannot be mapped to a
/// rectangle resolves to `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoded data could not be interpreted.
    #[error("data corrupted: {description}")]
    DataCorrupted {
        /// The offending input and what was wrong with it.
        description: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::DataCorrupted`] from any message.
    pub fn corrupted<M: Into<String>>(description: M) -> Self {
        Self::DataCorrupted {
            description: description.into(),
        }
    }
}
