//! Graph store - synchronized dependency graph for deployment units
//!
//! This module provides the aggregate root that owns the node set and
//! both adjacency directions. All reads and mutations go through its
//! API; internal maps are never exposed by reference.
//!
//! # Design
//!
//! The graph uses a bidirectional adjacency list representation:
//! - `adjacency`: IDs a node depends on (forward edges)
//! - `reverse_adjacency`: IDs that depend on a node (back edges),
//!   maintained strictly as the transpose of `adjacency`
//!
//! This allows O(1) access to both dependencies and dependents, which
//! the planner needs for in-degree bookkeeping and the validator needs
//! for consistency checks.
//!
//! # Concurrency
//!
//! A single reader/writer lock protects all state. Mutations hold the
//! write lock for their full duration; compound mutations (node removal
//! detaching every incident edge) go through `_locked` variants on the
//! inner state so the lock is never re-entered. Reads hold the read
//! lock and return deep copies, so concurrent readers can never observe
//! torn writes or mutate shared state through returned values.
//!
//! Cycle prevention is deliberately NOT enforced here: `add_edge`
//! accepts edges that close a cycle, and callers who need strict
//! acyclicity run
//! [`Validator::validate_edge_addition`](crate::validate::Validator::validate_edge_addition)
//! first. Keeping mutation and policy separate lets a reconciliation
//! loop represent a transiently invalid declared state and remediate it
//! afterwards.

use super::error::{GraphError, GraphResult};
use super::node::{DeploymentNode, DeploymentStatus};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Inserts `value` into a sorted, de-duplicated ID list.
fn insert_sorted(list: &mut Vec<String>, value: &str) {
    if let Err(pos) = list.binary_search_by(|probe| probe.as_str().cmp(value)) {
        list.insert(pos, value.to_string());
    }
}

/// Removes `value` from a sorted ID list if present.
fn remove_sorted(list: &mut Vec<String>, value: &str) {
    if let Ok(pos) = list.binary_search_by(|probe| probe.as_str().cmp(value)) {
        list.remove(pos);
    }
}

/// Graph state guarded by the store's lock.
///
/// The validator and planner borrow this directly (through
/// [`DependencyGraph::read`]) so an entire analysis pass sees one
/// consistent snapshot.
#[derive(Debug, Default)]
pub(crate) struct GraphInner {
    /// Map from node ID to node
    pub(crate) nodes: HashMap<String, DeploymentNode>,
    /// Forward edges: node ID -> IDs it depends on
    pub(crate) adjacency: HashMap<String, Vec<String>>,
    /// Back edges: node ID -> IDs that depend on it
    pub(crate) reverse_adjacency: HashMap<String, Vec<String>>,
}

impl GraphInner {
    /// Removes the edge `from -> to` from both adjacency directions and
    /// both node-level mirrors. No-op if the edge or either endpoint is
    /// absent.
    ///
    /// Callers must already hold the write lock.
    fn remove_edge_locked(&mut self, from: &str, to: &str) {
        if !self.nodes.contains_key(from) || !self.nodes.contains_key(to) {
            return;
        }
        if let Some(deps) = self.adjacency.get_mut(from) {
            remove_sorted(deps, to);
        }
        if let Some(dependents) = self.reverse_adjacency.get_mut(to) {
            remove_sorted(dependents, from);
        }
        if let Some(node) = self.nodes.get_mut(from) {
            remove_sorted(&mut node.dependencies, to);
        }
        if let Some(node) = self.nodes.get_mut(to) {
            remove_sorted(&mut node.dependents, from);
        }
    }

    /// Nodes with no dependencies, sorted by ID.
    pub(crate) fn roots_locked(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.dependencies.is_empty())
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

/// A synchronized directed graph of deployment units
///
/// An edge `from -> to` means *from depends on to*: `to` must reach a
/// terminal state before `from` may run. The graph may be shared as
/// `Arc<DependencyGraph>` across reconciliation workers; every method
/// takes `&self`.
///
/// # Example
///
/// ```
/// use fleetgraph::{DependencyGraph, DeploymentNode};
///
/// let graph = DependencyGraph::new();
/// graph.add_node(DeploymentNode::new("api", "API Server")).unwrap();
/// graph.add_node(DeploymentNode::new("db", "Database")).unwrap();
///
/// // api depends on db
/// graph.add_edge("api", "db").unwrap();
///
/// assert_eq!(graph.get_dependencies("api").unwrap(), vec!["db".to_string()]);
/// assert_eq!(graph.get_dependents("db").unwrap(), vec!["api".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct DependencyGraph {
    inner: RwLock<GraphInner>,
}

impl DependencyGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the read lock for an analysis pass.
    ///
    /// The validator and planner hold this guard for the whole pass so
    /// they analyze one consistent snapshot; writers block for the
    /// duration.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
        self.inner.read()
    }

    /// Direct write access for tests that need to simulate internal
    /// corruption (the public API cannot produce dangling references or
    /// mirror mismatches).
    #[cfg(test)]
    pub(crate) fn write(&self) -> parking_lot::RwLockWriteGuard<'_, GraphInner> {
        self.inner.write()
    }

    /// Adds a node to the graph.
    ///
    /// The node is stored with empty dependency/dependent mirrors and
    /// empty adjacency entries; edges are declared separately through
    /// [`add_edge`](Self::add_edge). Caller-supplied metadata, status,
    /// and timestamps are kept.
    ///
    /// Returns an error if the ID is empty or already present. On error
    /// the graph is unchanged.
    pub fn add_node(&self, mut node: DeploymentNode) -> GraphResult<()> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyNodeId);
        }

        let mut inner = self.inner.write();
        if inner.nodes.contains_key(&node.id) {
            return Err(GraphError::duplicate_node(node.id));
        }

        // Adjacency entries own edge state from the moment of insertion.
        node.dependencies = Vec::new();
        node.dependents = Vec::new();

        let id = node.id.clone();
        inner.adjacency.insert(id.clone(), Vec::new());
        inner.reverse_adjacency.insert(id.clone(), Vec::new());
        inner.nodes.insert(id.clone(), node);

        debug!(node_id = %id, "added node");
        Ok(())
    }

    /// Removes a node and every edge incident to it, in both directions.
    ///
    /// Returns an error if the node is not present.
    pub fn remove_node(&self, id: &str) -> GraphResult<()> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(id) {
            return Err(GraphError::node_not_found(id));
        }

        let dependencies = inner.adjacency.get(id).cloned().unwrap_or_default();
        for dep in &dependencies {
            inner.remove_edge_locked(id, dep);
        }
        let dependents = inner.reverse_adjacency.get(id).cloned().unwrap_or_default();
        for dependent in &dependents {
            inner.remove_edge_locked(dependent, id);
        }

        inner.adjacency.remove(id);
        inner.reverse_adjacency.remove(id);
        inner.nodes.remove(id);

        debug!(node_id = %id, "removed node");
        Ok(())
    }

    /// Adds the edge `from -> to`, meaning *from depends on to*.
    ///
    /// Adding an edge that already exists is a no-op. Returns an error
    /// if `from == to` or either endpoint is missing.
    ///
    /// This call does NOT check for cycles; see the module docs for the
    /// mutation/policy split.
    pub fn add_edge(&self, from: &str, to: &str) -> GraphResult<()> {
        if from == to {
            return Err(GraphError::self_dependency(from));
        }

        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(from) {
            return Err(GraphError::node_not_found(from));
        }
        if !inner.nodes.contains_key(to) {
            return Err(GraphError::node_not_found(to));
        }

        // Idempotent: the adjacency entry is authoritative.
        if inner
            .adjacency
            .get(from)
            .is_some_and(|deps| deps.iter().any(|d| d == to))
        {
            return Ok(());
        }

        if let Some(deps) = inner.adjacency.get_mut(from) {
            insert_sorted(deps, to);
        }
        if let Some(dependents) = inner.reverse_adjacency.get_mut(to) {
            insert_sorted(dependents, from);
        }
        if let Some(node) = inner.nodes.get_mut(from) {
            insert_sorted(&mut node.dependencies, to);
        }
        if let Some(node) = inner.nodes.get_mut(to) {
            insert_sorted(&mut node.dependents, from);
        }

        debug!(from = %from, to = %to, "added edge");
        Ok(())
    }

    /// Removes the edge `from -> to`.
    ///
    /// Silently no-ops if the edge or either endpoint does not exist.
    /// Unlike [`remove_node`](Self::remove_node), a missing target is
    /// not an error: edge removal is declarative ("this dependency must
    /// not exist") and is safe to replay.
    pub fn remove_edge(&self, from: &str, to: &str) {
        let mut inner = self.inner.write();
        inner.remove_edge_locked(from, to);
        debug!(from = %from, to = %to, "removed edge");
    }

    /// Overwrites the status of a node.
    ///
    /// Returns an error if the node is not present.
    pub fn update_node_status(&self, id: &str, status: DeploymentStatus) -> GraphResult<()> {
        let mut inner = self.inner.write();
        let node = inner
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        node.status = status;
        node.updated_at = chrono::Utc::now();
        debug!(node_id = %id, status = %status, "updated node status");
        Ok(())
    }

    /// Returns a deep copy of a node, or `None` if absent.
    pub fn get_node(&self, id: &str) -> Option<DeploymentNode> {
        self.inner.read().nodes.get(id).cloned()
    }

    /// Returns deep copies of all nodes, sorted by ID.
    pub fn get_all_nodes(&self) -> Vec<DeploymentNode> {
        let inner = self.inner.read();
        let mut nodes: Vec<DeploymentNode> = inner.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Returns a copy of the IDs a node depends on, or `None` if the
    /// node is absent.
    pub fn get_dependencies(&self, id: &str) -> Option<Vec<String>> {
        self.inner.read().adjacency.get(id).cloned()
    }

    /// Returns a copy of the IDs that depend on a node, or `None` if
    /// the node is absent.
    pub fn get_dependents(&self, id: &str) -> Option<Vec<String>> {
        self.inner.read().reverse_adjacency.get(id).cloned()
    }

    /// Returns true if the node exists in the graph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.inner.read().nodes.contains_key(id)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.read().adjacency.values().map(Vec::len).sum()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.read().nodes.is_empty()
    }

    /// Returns the nodes with no dependencies, sorted by ID.
    ///
    /// These are the candidates for the first scheduling level.
    pub fn roots(&self) -> Vec<String> {
        self.inner.read().roots_locked()
    }

    /// Returns the nodes nothing depends on, sorted by ID.
    ///
    /// These are the terminal units of a rollout.
    pub fn leaves(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut ids: Vec<String> = inner
            .nodes
            .values()
            .filter(|n| n.dependents.is_empty())
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Returns the nodes that can run now given the completed set,
    /// sorted by ID.
    ///
    /// A node is runnable when it is not itself completed and every one
    /// of its dependencies is in `completed`. A level-by-level
    /// dispatcher polls this between levels.
    pub fn runnable(&self, completed: &HashSet<String>) -> Vec<String> {
        let inner = self.inner.read();
        let mut ready: Vec<String> = inner
            .nodes
            .values()
            .filter(|n| !completed.contains(&n.id))
            .filter(|n| n.dependencies.iter().all(|d| completed.contains(d)))
            .map(|n| n.id.clone())
            .collect();
        ready.sort();
        ready
    }
}
