//! Graph validator and cycle detector
//!
//! Read-only analysis over the graph store. A full [`Validator::validate`]
//! pass runs four independent checks and aggregates everything it finds:
//!
//! 1. **Structural** - every declared dependency references an existing
//!    node; self-references are errors (or warnings when allowed);
//!    adjacency lists agree with the node-level mirrors
//! 2. **Cycles** - exhaustive enumeration via DFS three-color marking,
//!    each cycle reconstructed as an ordered path returning to its start
//! 3. **Depth** - longest dependency chain per node, bounded by
//!    `max_dependency_depth` (warnings only)
//! 4. **Completeness** - required fields are non-empty
//!
//! The pre-flight helpers [`Validator::validate_node_addition`] and
//! [`Validator::validate_edge_addition`] let a caller reject a mutation
//! before committing it; the store itself never enforces acyclicity.

use super::config::{RequiredField, ValidationConfig};
use super::result::ValidationResult;
use crate::graph::{DependencyGraph, DeploymentNode, GraphError, GraphInner, GraphResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Enumerates every cycle reachable in the graph.
///
/// Classic DFS coloring: white = unvisited, gray = on the recursion
/// stack, black = finished. A back edge into a gray node yields a
/// cycle, reconstructed by walking the parent map from the back edge's
/// source up to its target and closing the loop. Nodes are started and
/// dependencies iterated in sorted order, so output is deterministic.
///
/// Self-loops are skipped here; the structural pass owns them.
pub(crate) fn find_cycles(inner: &GraphInner) -> Vec<Vec<String>> {
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    let mut parent: HashMap<String, String> = HashMap::new();
    let mut cycles = Vec::new();

    let mut ids: Vec<&String> = inner.nodes.keys().collect();
    ids.sort();

    for id in ids {
        if !visited.contains(id.as_str()) {
            cycle_dfs(inner, id, &mut visited, &mut on_stack, &mut parent, &mut cycles);
        }
    }

    cycles
}

fn cycle_dfs(
    inner: &GraphInner,
    node: &str,
    visited: &mut HashSet<String>,
    on_stack: &mut HashSet<String>,
    parent: &mut HashMap<String, String>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node.to_string());
    on_stack.insert(node.to_string());

    if let Some(deps) = inner.adjacency.get(node) {
        for dep in deps {
            if dep == node {
                continue;
            }
            if !visited.contains(dep.as_str()) {
                parent.insert(dep.clone(), node.to_string());
                cycle_dfs(inner, dep, visited, on_stack, parent, cycles);
            } else if on_stack.contains(dep.as_str()) {
                // Back edge: dep is an ancestor of node on the current
                // path, so walking the parent map from node reaches it.
                let mut path = vec![node.to_string()];
                let mut cur = node.to_string();
                while cur != *dep {
                    cur = parent[&cur].clone();
                    path.push(cur.clone());
                }
                path.reverse();
                path.push(dep.clone());
                cycles.push(path);
            }
        }
    }

    on_stack.remove(node);
}

/// Longest dependency chain below `id`, counted in edges.
///
/// The per-call `visiting` set guards against infinite recursion when
/// the graph already contains a cycle; entries are removed on exit so
/// diamonds still measure their full depth.
fn chain_depth(inner: &GraphInner, id: &str, visiting: &mut HashSet<String>) -> usize {
    if !visiting.insert(id.to_string()) {
        return 0;
    }

    let mut max = 0;
    if let Some(deps) = inner.adjacency.get(id) {
        for dep in deps {
            if dep == id {
                continue;
            }
            max = max.max(1 + chain_depth(inner, dep, visiting));
        }
    }

    visiting.remove(id);
    max
}

/// Returns true if `target` is reachable from `from` along dependency
/// edges.
fn reaches(inner: &GraphInner, from: &str, target: &str, visited: &mut HashSet<String>) -> bool {
    if from == target {
        return true;
    }
    if !visited.insert(from.to_string()) {
        return false;
    }
    inner
        .adjacency
        .get(from)
        .is_some_and(|deps| deps.iter().any(|dep| reaches(inner, dep, target, visited)))
}

/// Read-only structural and semantic analysis over a dependency graph
///
/// The validator never mutates the graph. A pass holds the graph's read
/// lock for its full duration, so it sees one consistent snapshot and
/// blocks writers while it runs.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Creates a validator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with an explicit configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Runs all four validation passes and aggregates the findings.
    ///
    /// An empty graph is valid but draws a warning.
    pub fn validate(&self, graph: &DependencyGraph) -> ValidationResult {
        let inner = graph.read();
        let mut result = ValidationResult::default();

        if inner.nodes.is_empty() {
            result.warning("graph is empty");
            return result;
        }

        self.check_structure(&inner, &mut result);
        self.check_cycles(&inner, &mut result);
        self.check_depth(&inner, &mut result);
        self.check_completeness(&inner, &mut result);

        debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            cycles = result.cycles.len(),
            "validation pass finished"
        );
        result
    }

    /// Re-checks the constraints `add_node` would enforce, without
    /// mutating the graph.
    pub fn validate_node_addition(
        &self,
        graph: &DependencyGraph,
        node: &DeploymentNode,
    ) -> GraphResult<()> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyNodeId);
        }
        if graph.contains_node(&node.id) {
            return Err(GraphError::duplicate_node(node.id.clone()));
        }
        Ok(())
    }

    /// Rejects the edge `from -> to` if it would close a cycle, i.e. if
    /// `from` is already reachable from `to` along dependency edges.
    ///
    /// Callers who want strict acyclicity run this before every
    /// `add_edge`; the store itself does not.
    pub fn validate_edge_addition(
        &self,
        graph: &DependencyGraph,
        from: &str,
        to: &str,
    ) -> GraphResult<()> {
        if from == to {
            return Err(GraphError::self_dependency(from));
        }

        let inner = graph.read();
        if !inner.nodes.contains_key(from) {
            return Err(GraphError::node_not_found(from));
        }
        if !inner.nodes.contains_key(to) {
            return Err(GraphError::node_not_found(to));
        }

        let mut visited = HashSet::new();
        if reaches(&inner, to, from, &mut visited) {
            return Err(GraphError::cycle(format!(
                "adding edge {} -> {} would create a cycle",
                from, to
            )));
        }

        Ok(())
    }

    fn check_structure(&self, inner: &GraphInner, result: &mut ValidationResult) {
        let mut ids: Vec<&String> = inner.nodes.keys().collect();
        ids.sort();

        for id in ids {
            let node = &inner.nodes[id.as_str()];

            for dep in &node.dependencies {
                if dep == id {
                    if self.config.allow_self_reference {
                        result.warning(format!("node '{}' references itself", id));
                    } else {
                        result.error(format!("node '{}' depends on itself", id));
                    }
                } else if !inner.nodes.contains_key(dep.as_str()) {
                    result.error(format!(
                        "node '{}' depends on unknown node '{}'",
                        id, dep
                    ));
                }
            }

            // Length mismatches signal internal corruption, not bad input.
            let adj_len = inner.adjacency.get(id.as_str()).map_or(0, Vec::len);
            if adj_len != node.dependencies.len() {
                result.error(format!(
                    "adjacency list for '{}' disagrees with its dependency mirror ({} vs {})",
                    id,
                    adj_len,
                    node.dependencies.len()
                ));
            }
            let rev_len = inner.reverse_adjacency.get(id.as_str()).map_or(0, Vec::len);
            if rev_len != node.dependents.len() {
                result.error(format!(
                    "reverse adjacency list for '{}' disagrees with its dependent mirror ({} vs {})",
                    id,
                    rev_len,
                    node.dependents.len()
                ));
            }
        }
    }

    fn check_cycles(&self, inner: &GraphInner, result: &mut ValidationResult) {
        for cycle in find_cycles(inner) {
            warn!(path = %cycle.join(" -> "), "dependency cycle detected");
            result.error(format!(
                "dependency cycle detected: {}",
                cycle.join(" -> ")
            ));
            result.cycles.push(cycle);
        }
    }

    fn check_depth(&self, inner: &GraphInner, result: &mut ValidationResult) {
        let mut ids: Vec<&String> = inner.nodes.keys().collect();
        ids.sort();

        for id in ids {
            let mut visiting = HashSet::new();
            let depth = chain_depth(inner, id, &mut visiting);
            if depth > self.config.max_dependency_depth {
                result.warning(format!(
                    "dependency chain for '{}' has depth {}, exceeding maximum {}",
                    id, depth, self.config.max_dependency_depth
                ));
            }
        }
    }

    fn check_completeness(&self, inner: &GraphInner, result: &mut ValidationResult) {
        let mut ids: Vec<&String> = inner.nodes.keys().collect();
        ids.sort();

        for id in ids {
            let node = &inner.nodes[id.as_str()];
            for field in &self.config.required_fields {
                let value = match field {
                    RequiredField::Id => &node.id,
                    RequiredField::Name => &node.name,
                    RequiredField::Workspace => &node.workspace,
                };
                if value.is_empty() {
                    result.error(format!(
                        "node '{}' is missing required field '{}'",
                        id, field
                    ));
                }
            }
        }
    }
}
