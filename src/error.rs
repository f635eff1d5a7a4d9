//! Error type shared by every plotting entry point.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can go wrong between a [`crate::PlotRequest`] and a file on disk.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Required request fields (`data`, `filename`) are missing.
    /// Raised before any script is generated or any process is spawned.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external program could not be started (not installed, not executable, ...).
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Writing the script to the child or opening the destination failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The external program ran but exited unsuccessfully.
    ///
    /// `stdout` holds whatever text output was captured before the failure
    /// (for pdf, the converter's stdout).
    #[error("`{program}` exited with {status}: {stderr}")]
    ExternalProcess {
        program: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

impl PlotError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        PlotError::InvalidInput(msg.into())
    }

    /// True for errors raised by request validation (never retried, never spawned).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PlotError::InvalidInput(_))
    }
}
