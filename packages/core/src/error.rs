//! Error type returned by [`EditorStore`](crate::EditorStore) operations.
//!
//! Every error leaves the store exactly as it was before the call.

use thiserror::Error;

use crate::graph::GraphError;
use crate::validation::ValidationError;

/// Why a store operation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The block or its payload is incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The edge would be a self-loop, a duplicate or close a cycle.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// No block with this id; usually a stale reference after a delete.
    #[error("block {0} not found")]
    NotFound(String),

    /// No edge with this id.
    #[error("edge {0} not found")]
    EdgeNotFound(String),

    /// An edge endpoint does not name a registered block.
    #[error("cannot connect unknown block {0}")]
    UnknownBlock(String),

    /// An externally supplied id is already used by another block.
    #[error("block id {0} is already in use")]
    IdConflict(String),
}

impl StoreError {
    /// Whether this is a stale-reference no-op rather than a rejection the
    /// author needs to hear about.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::EdgeNotFound(_))
    }
}
