//! Execution planner
//!
//! Computes a leveled topological ordering of the dependency graph
//! using Kahn's algorithm generalized to levels:
//!
//! 1. Compute in-degree for every node (its number of dependencies)
//! 2. Level 0 = all nodes with in-degree 0
//! 3. Conceptually remove the level, decrementing the in-degree of
//!    each member's dependents
//! 4. The next level = nodes whose in-degree reached 0; repeat
//! 5. If no node has in-degree 0 but unplaced nodes remain, the graph
//!    contains a cycle
//!
//! Members of a level are sorted by ID so output is reproducible.

use super::plan::ExecutionPlan;
use crate::graph::DependencyGraph;
use crate::validate::find_cycles;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Produces leveled execution plans from a dependency graph
///
/// Read-only: planning holds the graph's read lock for its duration and
/// never mutates state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionPlanner;

impl ExecutionPlanner {
    /// Creates a new planner
    pub fn new() -> Self {
        Self
    }

    /// Computes the execution plan for the graph's current state.
    ///
    /// Always returns a plan; on a cyclic graph the plan is flagged via
    /// [`ExecutionPlan::has_cycle`] and carries one cycle path
    /// identified by the cycle detector, with levels covering only the
    /// acyclic prefix.
    pub fn plan(&self, graph: &DependencyGraph) -> ExecutionPlan {
        let inner = graph.read();
        let total = inner.nodes.len();

        let mut in_degree: HashMap<String, usize> = inner
            .nodes
            .values()
            .map(|n| (n.id.clone(), n.dependencies.len()))
            .collect();
        let mut placed: HashSet<String> = HashSet::new();
        let mut levels: Vec<Vec<String>> = Vec::new();
        let mut order: Vec<String> = Vec::new();

        while placed.len() < total {
            let mut level: Vec<String> = in_degree
                .iter()
                .filter(|(id, degree)| **degree == 0 && !placed.contains(id.as_str()))
                .map(|(id, _)| id.clone())
                .collect();
            level.sort();

            if level.is_empty() {
                // Unplaced nodes with nonzero in-degree: a cycle.
                let cycle_path = find_cycles(&inner).into_iter().next();
                warn!(
                    placed = placed.len(),
                    total,
                    "planning aborted: dependency cycle"
                );
                return ExecutionPlan::cyclic(levels, order, cycle_path);
            }

            for id in &level {
                placed.insert(id.clone());
                if let Some(dependents) = inner.reverse_adjacency.get(id) {
                    for dependent in dependents {
                        if let Some(degree) = in_degree.get_mut(dependent) {
                            *degree = degree.saturating_sub(1);
                        }
                    }
                }
            }

            order.extend(level.iter().cloned());
            levels.push(level);
        }

        debug!(levels = levels.len(), nodes = total, "execution plan computed");
        ExecutionPlan::valid(levels, order)
    }

    /// Verifies that `order` respects every dependency edge.
    ///
    /// For every edge `from -> to` (from depends on to), `to` must
    /// appear before `from`. Returns false if an edge endpoint is
    /// missing from `order`. This is the correctness property any
    /// produced order must satisfy.
    pub fn is_valid_execution_order(&self, graph: &DependencyGraph, order: &[String]) -> bool {
        let inner = graph.read();
        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        for (from, deps) in &inner.adjacency {
            for to in deps {
                match (position.get(from.as_str()), position.get(to.as_str())) {
                    (Some(from_pos), Some(to_pos)) if to_pos < from_pos => {}
                    _ => return false,
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyGraph, DeploymentNode};
    use crate::validate::Validator;

    fn node(id: &str) -> DeploymentNode {
        DeploymentNode::new(id, format!("{} deployment", id))
    }

    fn ids(slice: &[String]) -> Vec<&str> {
        slice.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_linear_chain() {
        let graph = DependencyGraph::new();
        graph.add_node(node("app1")).unwrap();
        graph.add_node(node("app2")).unwrap();
        graph.add_node(node("app3")).unwrap();
        graph.add_edge("app1", "app2").unwrap();
        graph.add_edge("app2", "app3").unwrap();

        let planner = ExecutionPlanner::new();
        let plan = planner.plan(&graph);

        assert!(!plan.has_cycle());
        assert_eq!(plan.total_levels(), 3);
        assert_eq!(ids(plan.nodes_at_level(0).unwrap()), vec!["app3"]);
        assert_eq!(ids(plan.nodes_at_level(1).unwrap()), vec!["app2"]);
        assert_eq!(ids(plan.nodes_at_level(2).unwrap()), vec!["app1"]);
        assert_eq!(ids(plan.order()), vec!["app3", "app2", "app1"]);
        assert!(planner.is_valid_execution_order(&graph, plan.order()));
    }

    #[test]
    fn test_diamond_with_shared_leaves() {
        let graph = DependencyGraph::new();
        for id in ["db", "cache", "api", "frontend", "monitor"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge("frontend", "api").unwrap();
        graph.add_edge("api", "cache").unwrap();
        graph.add_edge("api", "db").unwrap();
        graph.add_edge("monitor", "api").unwrap();

        let planner = ExecutionPlanner::new();
        let plan = planner.plan(&graph);

        assert!(!plan.has_cycle());
        assert!(plan.total_levels() >= 3);
        assert_eq!(ids(plan.nodes_at_level(0).unwrap()), vec!["cache", "db"]);
        assert_eq!(ids(plan.nodes_at_level(1).unwrap()), vec!["api"]);
        assert_eq!(
            ids(plan.nodes_at_level(2).unwrap()),
            vec!["frontend", "monitor"]
        );
        assert!(planner.is_valid_execution_order(&graph, plan.order()));
    }

    #[test]
    fn test_level_correctness() {
        let graph = DependencyGraph::new();
        for id in ["a", "b", "c", "d", "e", "f"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge("a", "c").unwrap();
        graph.add_edge("b", "c").unwrap();
        graph.add_edge("c", "e").unwrap();
        graph.add_edge("d", "e").unwrap();
        graph.add_edge("d", "f").unwrap();

        let plan = ExecutionPlanner::new().plan(&graph);
        assert!(!plan.has_cycle());

        // Every dependency of a node at level L sits in some level < L,
        // and level 0 holds exactly the zero-dependency nodes.
        let mut level_of = std::collections::HashMap::new();
        for (level, members) in plan.levels().iter().enumerate() {
            for id in members {
                level_of.insert(id.clone(), level);
            }
        }
        for n in graph.get_all_nodes() {
            if n.dependencies.is_empty() {
                assert_eq!(level_of[&n.id], 0);
            }
            for dep in &n.dependencies {
                assert!(level_of[dep] < level_of[&n.id]);
            }
        }
    }

    #[test]
    fn test_cycle_round_trip() {
        let graph = DependencyGraph::new();
        graph.add_node(node("a")).unwrap();
        graph.add_node(node("b")).unwrap();
        graph.add_node(node("c")).unwrap();
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "c").unwrap();
        graph.add_edge("c", "a").unwrap();

        let result = Validator::new().validate(&graph);
        assert!(!result.is_valid());
        assert_eq!(result.cycles.len(), 1);

        let plan = ExecutionPlanner::new().plan(&graph);
        assert!(plan.has_cycle());
        assert_eq!(plan.cycle_path(), Some(&result.cycles[0][..]));
        assert_eq!(plan.total_levels(), 0);
    }

    #[test]
    fn test_partial_cycle_keeps_acyclic_prefix() {
        let graph = DependencyGraph::new();
        for id in ["base", "x", "y"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge("x", "y").unwrap();
        graph.add_edge("y", "x").unwrap();

        let plan = ExecutionPlanner::new().plan(&graph);
        assert!(plan.has_cycle());
        assert_eq!(ids(plan.nodes_at_level(0).unwrap()), vec!["base"]);
        assert!(plan.cycle_path().is_some());
    }

    #[test]
    fn test_empty_graph_plan() {
        let graph = DependencyGraph::new();
        let plan = ExecutionPlanner::new().plan(&graph);
        assert!(!plan.has_cycle());
        assert!(plan.is_empty());
        assert_eq!(plan.total_levels(), 0);
    }

    #[test]
    fn test_disconnected_components() {
        let graph = DependencyGraph::new();
        for id in ["a", "b", "lonely"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge("a", "b").unwrap();

        let plan = ExecutionPlanner::new().plan(&graph);
        assert!(!plan.has_cycle());
        assert_eq!(ids(plan.nodes_at_level(0).unwrap()), vec!["b", "lonely"]);
        assert_eq!(ids(plan.nodes_at_level(1).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_is_valid_execution_order_rejects_bad_orders() {
        let graph = DependencyGraph::new();
        graph.add_node(node("api")).unwrap();
        graph.add_node(node("db")).unwrap();
        graph.add_edge("api", "db").unwrap();

        let planner = ExecutionPlanner::new();
        let good = vec!["db".to_string(), "api".to_string()];
        let reversed = vec!["api".to_string(), "db".to_string()];
        let missing = vec!["db".to_string()];

        assert!(planner.is_valid_execution_order(&graph, &good));
        assert!(!planner.is_valid_execution_order(&graph, &reversed));
        assert!(!planner.is_valid_execution_order(&graph, &missing));
    }
}
