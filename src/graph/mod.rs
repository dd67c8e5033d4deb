//! Dependency graph for deployment units
//!
//! This module provides the synchronized graph store that all other
//! components read and mutate. It maintains:
//!
//! - The node set (deployment units with identity and status)
//! - Forward and reverse adjacency lists, kept strictly as transposes
//!   of each other
//! - Node-level dependency/dependent mirrors, sorted for deterministic
//!   iteration
//!
//! # Design Principles
//!
//! Following Parnas's information hiding principles:
//! - The module hides the graph representation (adjacency list vs matrix)
//! - Exposes only abstract operations: `add_node`, `add_edge`,
//!   `runnable`, etc., all of which copy out rather than alias internals

mod dot;
mod error;
mod node;
mod store;

pub use error::{GraphError, GraphResult};
pub use node::{DeploymentNode, DeploymentStatus};
pub use store::DependencyGraph;

pub(crate) use store::GraphInner;
