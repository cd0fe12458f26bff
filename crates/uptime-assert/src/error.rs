//! Error types for the uptime-assert crate.

use thiserror::Error;

/// Errors raised by the fallible parts of the assertion engine.
///
/// Construction, classification, normalization and merging are total and
/// never produce these; they come from edits addressed by id, bounds
/// validation and the JSON boundary.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// Status code bounds are inconsistent.
    #[error("invalid status code bounds: {reason}")]
    InvalidBounds {
        /// Why the bounds were rejected.
        reason: String,
    },

    /// No node with the given id exists in the tree.
    #[error("node not found: {id}")]
    NodeNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The addressed node is not an `and`/`or` group.
    #[error("node is not a group: {id}")]
    NotAGroup {
        /// The id of the non-group node.
        id: String,
    },

    /// The root group of an assertion cannot be removed.
    #[error("the assertion root cannot be removed")]
    CannotRemoveRoot,

    /// The root group of an assertion cannot be duplicated.
    #[error("the assertion root cannot be duplicated")]
    CannotDuplicateRoot,

    /// A node carries an `op` tag this crate does not know.
    #[error("unrecognized op: {tag}")]
    UnknownOp {
        /// The offending tag, or `<missing>` when there was none.
        tag: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AssertionError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type for assertion operations.
pub type Result<T> = std::result::Result<T, AssertionError>;
