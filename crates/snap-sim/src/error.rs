//! Error handling for the snap-sim crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for snap-sim operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The scenario file is not valid JSON for a scenario.
    #[error("Scenario error: {0}")]
    Scenario(#[from] serde_json::Error),
    /// Controller configuration or window errors.
    #[error("Controller error: {0}")]
    Motion(#[from] snap_motion::Error),
    /// Generic error for unexpected conditions.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Helper for wrapping generic string errors.
    pub fn other<M: Into<String>>(msg: M) -> Self {
        Self::Other(msg.into())
    }
}
