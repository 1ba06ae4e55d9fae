//! Grouping errors.
//!
//! Every failure the engine reports is a value. Callers branch on
//! [`GroupingError::kind`] rather than on message text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GroupingError {
    #[error("Need at least 2 eligible tabs to organize, found {eligible}")]
    InsufficientInput { eligible: usize },

    #[error("Invalid group labels: {0}")]
    InvalidLabels(String),

    #[error("Invalid group count: {0}")]
    InvalidGroupCount(String),

    #[error("Invalid grouping config: {0}")]
    InvalidConfig(String),
}

/// Coarse error category for caller-side handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientInput,
    Validation,
    Configuration,
}

impl ErrorKind {
    /// None of the engine's failures change on an identical retry.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl GroupingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroupingError::InsufficientInput { .. } => ErrorKind::InsufficientInput,
            GroupingError::InvalidLabels(_) | GroupingError::InvalidGroupCount(_) => {
                ErrorKind::Validation
            }
            GroupingError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }
}
