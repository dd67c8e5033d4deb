//! Fleetgraph: Dependency Coordination for Fleet-Wide Rollouts
//!
//! `fleetgraph` tracks dependency relationships among deployable units
//! distributed across a multi-cluster fleet and computes safe,
//! parallelizable execution orders for them. It provides:
//!
//! - **Synchronized graph store**: add/remove nodes and edges under a
//!   single reader/writer lock, with copy-out reads safe for concurrent
//!   reconciliation workers
//! - **Validation**: structural integrity, exhaustive cycle
//!   enumeration, dependency-depth bounding, and required-field checks,
//!   aggregated into one result
//! - **Execution planning**: Kahn's algorithm generalized to levels, so
//!   independent deployments dispatch in parallel while dependency
//!   order is respected
//!
//! The crate is a pure, in-memory coordination structure: it does not
//! execute deployments, perform network calls, or persist state. The
//! reconciliation loops that feed it, the health detectors that mark
//! nodes failed, and the dispatcher that consumes plans are external
//! collaborators.
//!
//! # Quick Start
//!
//! ```
//! use fleetgraph::{DependencyGraph, DeploymentNode, ExecutionPlanner, Validator};
//!
//! let graph = DependencyGraph::new();
//! graph.add_node(DeploymentNode::new("db", "Database"))?;
//! graph.add_node(DeploymentNode::new("api", "API Server"))?;
//! graph.add_node(DeploymentNode::new("web", "Web Frontend"))?;
//!
//! // api depends on db, web depends on api
//! graph.add_edge("api", "db")?;
//! graph.add_edge("web", "api")?;
//!
//! let result = Validator::new().validate(&graph);
//! assert!(result.is_valid());
//!
//! let plan = ExecutionPlanner::new().plan(&graph);
//! assert_eq!(plan.total_levels(), 3);
//! assert_eq!(plan.nodes_at_level(0), Some(&["db".to_string()][..]));
//! # Ok::<(), fleetgraph::GraphError>(())
//! ```
//!
//! # Module Organization
//!
//! Following Parnas's information hiding principles, each module hides
//! a design decision that is likely to change:
//!
//! - [`graph`]: the store (hides the adjacency representation and the
//!   locking discipline)
//! - [`validate`]: validation and cycle detection (hides the traversal
//!   algorithms)
//! - [`plan`]: execution planning (hides the leveling strategy)
//!
//! # Mutation vs. Policy
//!
//! [`DependencyGraph::add_edge`] deliberately accepts edges that close
//! a cycle; [`Validator::validate_edge_addition`] is the opt-in guard
//! that rejects them. Keeping these separate lets callers represent a
//! transiently invalid declared state and remediate it, while strict
//! callers get acyclicity by running the pre-flight check before every
//! edge insertion.

pub mod graph;
pub mod plan;
pub mod validate;

pub use graph::{DependencyGraph, DeploymentNode, DeploymentStatus, GraphError, GraphResult};
pub use plan::{ExecutionPlan, ExecutionPlanner};
pub use validate::{RequiredField, ValidationConfig, ValidationResult, Validator};

// Re-export dependencies used in the public API so callers don't hit
// version mismatches.
pub use chrono;
pub use serde;

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use fleetgraph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::graph::{
        DependencyGraph, DeploymentNode, DeploymentStatus, GraphError, GraphResult,
    };
    pub use crate::plan::{ExecutionPlan, ExecutionPlanner};
    pub use crate::validate::{RequiredField, ValidationConfig, ValidationResult, Validator};
}
