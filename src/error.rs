//! Library error type.

use std::io;

use thiserror::Error;

/// Errors raised by topology ingestion, CSV and handoff I/O.
#[derive(Debug, Error)]
pub enum GridError {
    /// A node with this id is already part of the topology.
    #[error("duplicate node id \"{0}\"")]
    DuplicateNode(String),

    /// No node with this id exists.
    #[error("unknown node id \"{0}\"")]
    UnknownNode(String),

    /// A node record failed validation.
    #[error("invalid node \"{id}\": {field} {message}")]
    InvalidNode {
        /// Id of the rejected node (may be empty).
        id: String,
        /// Offending field name.
        field: &'static str,
        /// Constraint description.
        message: String,
    },

    /// Handoff keys are limited to ASCII letters, digits, `-` and `_`.
    #[error("invalid handoff key \"{0}\"")]
    InvalidKey(String),

    /// Underlying filesystem error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV (de)serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GridError>;
