//! Experiment result persistence port
//!
//! The store re-writes the whole result document after every completed
//! iteration so partial progress survives a mid-run failure.

use crate::experiment::ExperimentResult;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the result store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Checkpoint persistence for experiment results
pub trait ResultStore: Send + Sync {
    /// Overwrite the persisted document with the current state.
    ///
    /// Returns the path written to.
    fn checkpoint(&self, result: &ExperimentResult) -> Result<PathBuf, StoreError>;
}
