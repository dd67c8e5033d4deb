//! Deployment node type
//!
//! This module defines the node type stored in the dependency graph:
//! one schedulable deployment unit with an identity, a lifecycle
//! status, and mirrored views of its incoming and outgoing edges.
//!
//! # Design Decision
//!
//! Node IDs are caller-supplied strings rather than generated handles
//! because:
//! 1. They are human-readable in operator-facing output (cycle paths,
//!    execution plans, DOT renderings)
//! 2. They are stable across process restarts, so an external
//!    reconciliation loop can re-declare the same graph
//! 3. They match the identity the surrounding orchestration system
//!    already assigns to deployments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle status of a deployment unit
///
/// The graph algorithms treat status as opaque; it is written through
/// [`DependencyGraph::update_node_status`](crate::DependencyGraph::update_node_status)
/// by external health/failure detectors and read by the dispatcher that
/// waits for a level to reach terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentStatus {
    /// Not yet dispatched
    Pending,
    /// Currently executing
    InProgress,
    /// Finished successfully
    Completed,
    /// Finished unsuccessfully
    Failed,
    /// Held back, e.g. by a failed dependency
    Blocked,
}

impl DeploymentStatus {
    /// Returns true for states that end a deployment's execution.
    ///
    /// A level-by-level dispatcher waits for every node in the current
    /// level to become terminal before starting the next level.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Default for DeploymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Blocked => "blocked",
        };
        write!(f, "{}", s)
    }
}

/// One schedulable deployment unit in the dependency graph
///
/// `dependencies` and `dependents` mirror the graph's forward and
/// reverse adjacency lists; the store keeps both sorted and
/// de-duplicated so iteration order is deterministic. Both lists are
/// owned by the graph once the node is added — values returned from
/// getters are deep copies and mutating them has no effect on the
/// graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentNode {
    /// Globally unique identifier, immutable once added
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// Tenant/cluster scope; carried for context, never interpreted
    /// by graph algorithms
    pub workspace: String,
    /// IDs this node depends on (forward edges), sorted
    pub dependencies: Vec<String>,
    /// IDs that depend on this node (reverse edges), sorted
    pub dependents: Vec<String>,
    /// Current lifecycle status
    pub status: DeploymentStatus,
    /// Open caller-defined annotations
    pub metadata: HashMap<String, String>,
    /// When the node was created
    pub created_at: DateTime<Utc>,
    /// When the node last changed (status updates refresh this)
    pub updated_at: DateTime<Utc>,
}

impl DeploymentNode {
    /// Creates a new pending node with no edges
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            workspace: String::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            status: DeploymentStatus::Pending,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the workspace scope
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Adds a metadata annotation
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the in-degree (number of dependencies)
    pub fn in_degree(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns the out-degree (number of dependents)
    pub fn out_degree(&self) -> usize {
        self.dependents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = DeploymentNode::new("api", "API Server");
        assert_eq!(node.id, "api");
        assert_eq!(node.name, "API Server");
        assert_eq!(node.status, DeploymentStatus::Pending);
        assert!(node.dependencies.is_empty());
        assert!(node.dependents.is_empty());
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn test_node_builders() {
        let node = DeploymentNode::new("api", "API Server")
            .with_workspace("prod-east")
            .with_metadata("team", "platform");
        assert_eq!(node.workspace, "prod-east");
        assert_eq!(node.metadata.get("team").map(String::as_str), Some("platform"));
    }

    #[test]
    fn test_status_terminal() {
        assert!(DeploymentStatus::Completed.is_terminal());
        assert!(DeploymentStatus::Failed.is_terminal());
        assert!(!DeploymentStatus::Pending.is_terminal());
        assert!(!DeploymentStatus::InProgress.is_terminal());
        assert!(!DeploymentStatus::Blocked.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(DeploymentStatus::InProgress.to_string(), "in-progress");
        assert_eq!(DeploymentStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_node_serde_round_trip() {
        let node = DeploymentNode::new("db", "Database").with_workspace("prod");
        let json = serde_json::to_string(&node).unwrap();
        let back: DeploymentNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
