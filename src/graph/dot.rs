//! Graphviz DOT export
//!
//! Renders the dependency graph in DOT format for operator-facing
//! visualization. Edges are drawn in execution direction (dependency
//! points at dependent), so the picture reads top-down as "what runs
//! first feeds what runs next".

use super::store::DependencyGraph;
use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use std::collections::HashMap;

impl DependencyGraph {
    /// Generates a DOT format representation of the graph for Graphviz.
    ///
    /// Returns a string that can be saved to a `.dot` file and rendered
    /// with `dot -Tpng graph.dot -o graph.png`.
    pub fn to_dot(&self) -> String {
        let inner = self.read();

        let mut petgraph = DiGraph::<String, ()>::new();
        let mut indices = HashMap::new();

        let mut ids: Vec<&String> = inner.nodes.keys().collect();
        ids.sort();

        for id in &ids {
            let idx = petgraph.add_node((*id).clone());
            indices.insert((*id).clone(), idx);
        }

        // dependency -> dependent, the order execution flows
        for id in &ids {
            let dependent_idx = indices[id.as_str()];
            if let Some(deps) = inner.adjacency.get(id.as_str()) {
                for dep in deps {
                    if let Some(&dep_idx) = indices.get(dep) {
                        petgraph.add_edge(dep_idx, dependent_idx, ());
                    }
                }
            }
        }

        format!("{:?}", Dot::with_config(&petgraph, &[Config::EdgeNoLabel]))
    }
}
