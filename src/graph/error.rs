//! Error types for graph mutations
//!
//! This module hides error representation details and provides
//! a unified error type for all graph store operations.
//!
//! Mutation errors are returned synchronously with no partial mutation
//! performed. Analysis findings (dangling references, cycles, missing
//! fields) are never raised as errors here — they are aggregated into a
//! [`ValidationResult`](crate::validate::ValidationResult) so that a
//! single validation pass surfaces every problem at once.

use thiserror::Error;

/// Result type for graph store operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur during graph store mutations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// A node was added with an empty ID
    #[error("node ID must not be empty")]
    EmptyNodeId,

    /// A node was added with an ID that already exists
    #[error("duplicate node ID: {id}")]
    DuplicateNode {
        /// The duplicate node ID
        id: String,
    },

    /// An operation referenced a node that is not in the graph
    #[error("node not found: {id}")]
    NodeNotFound {
        /// The node ID that was not found
        id: String,
    },

    /// An edge was declared from a node to itself
    #[error("node '{id}' cannot depend on itself")]
    SelfDependency {
        /// The node with the self-dependency
        id: String,
    },

    /// An edge would close a dependency cycle
    #[error("cycle detected in dependency graph: {path}")]
    CycleDetected {
        /// Human-readable description of the cycle path
        path: String,
    },
}

impl GraphError {
    /// Creates a duplicate node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Creates a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Creates a self-dependency error
    pub fn self_dependency(id: impl Into<String>) -> Self {
        Self::SelfDependency { id: id.into() }
    }

    /// Creates a cycle detected error with the given path
    pub fn cycle(path: impl Into<String>) -> Self {
        Self::CycleDetected { path: path.into() }
    }
}
