//! Error types for landmark MDS

use std::fmt;
use thiserror::Error;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configuration,
    Selection,
    DistanceMatrix,
    Eigensolver,
    Triangulation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Selection => "landmark selection",
            Stage::DistanceMatrix => "distance matrix",
            Stage::Eigensolver => "eigen-decomposition",
            Stage::Triangulation => "triangulation",
        };
        f.write_str(name)
    }
}

/// Errors that terminate an embedding call.
///
/// None of these are retried internally and no partial result accompanies them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MdsError {
    /// Ratio yields no landmarks, zero target dimension, bad landmark indices,
    /// or inputs whose shapes disagree
    #[error("{stage}: invalid parameter: {message}")]
    InvalidParameter { stage: Stage, message: String },

    /// The distance callback failed for a pair of objects
    #[error("{stage}: distance function failed for objects {first} and {second}: {message}")]
    DistanceFunction {
        stage: Stage,
        first: usize,
        second: usize,
        message: String,
    },

    /// Non-positive eigenvalue or a non-finite value produced from finite inputs
    #[error("{stage}: numerical error: {message}")]
    Numerical { stage: Stage, message: String },

    /// The external eigensolver reported a failure
    #[error("eigen-decomposition failed: {0}")]
    Eigensolver(String),

    /// The per-call worker pool could not be started
    #[error("{stage}: failed to start worker pool: {message}")]
    WorkerPool { stage: Stage, message: String },
}

impl MdsError {
    pub(crate) fn invalid(stage: Stage, message: impl Into<String>) -> Self {
        MdsError::InvalidParameter {
            stage,
            message: message.into(),
        }
    }

    pub(crate) fn numerical(stage: Stage, message: impl Into<String>) -> Self {
        MdsError::Numerical {
            stage,
            message: message.into(),
        }
    }

    /// Stage the error was raised in
    pub fn stage(&self) -> Stage {
        match self {
            MdsError::InvalidParameter { stage, .. }
            | MdsError::DistanceFunction { stage, .. }
            | MdsError::Numerical { stage, .. }
            | MdsError::WorkerPool { stage, .. } => *stage,
            MdsError::Eigensolver(_) => Stage::Eigensolver,
        }
    }
}

/// Result type for landmark MDS operations
pub type MdsResult<T> = Result<T, MdsError>;
