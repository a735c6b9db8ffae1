use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the motion crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised by window handles and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// A window handle failed to read or apply a frame.
    #[error("window operation failed: {0}")]
    Window(String),

    /// Controller configuration could not be parsed.
    #[error("invalid controller config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Reading configuration from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The operation was interrupted by controller shutdown.
    #[error("cancelled")]
    Cancelled,
}
