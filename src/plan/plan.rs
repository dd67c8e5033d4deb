//! Execution plan type
//!
//! The leveled ordering produced by the planner. All nodes in one level
//! have no unresolved dependency on any node in the same or a later
//! level, so a dispatcher may run an entire level concurrently, wait
//! for terminal statuses, and move on.

use serde::{Deserialize, Serialize};

/// A leveled, dependency-respecting execution ordering
///
/// On a cyclic graph [`has_cycle`](Self::has_cycle) is set, the levels
/// and order cover only the acyclic prefix, and
/// [`cycle_path`](Self::cycle_path) names one offending cycle for the
/// operator; a dispatcher must halt rather than attempt partial
/// execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    levels: Vec<Vec<String>>,
    order: Vec<String>,
    has_cycle: bool,
    cycle_path: Option<Vec<String>>,
}

impl ExecutionPlan {
    pub(crate) fn valid(levels: Vec<Vec<String>>, order: Vec<String>) -> Self {
        Self {
            levels,
            order,
            has_cycle: false,
            cycle_path: None,
        }
    }

    pub(crate) fn cyclic(
        levels: Vec<Vec<String>>,
        order: Vec<String>,
        cycle_path: Option<Vec<String>>,
    ) -> Self {
        Self {
            levels,
            order,
            has_cycle: true,
            cycle_path,
        }
    }

    /// Number of scheduling levels
    pub fn total_levels(&self) -> usize {
        self.levels.len()
    }

    /// Node IDs at the given level, or `None` if the level does not
    /// exist
    pub fn nodes_at_level(&self, level: usize) -> Option<&[String]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// All levels in scheduling order
    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    /// Flattened, level-respecting total order (sequential fallback)
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// True if planning hit a cycle and the plan must not be executed
    pub fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    /// One detected cycle, when [`has_cycle`](Self::has_cycle) is set
    pub fn cycle_path(&self) -> Option<&[String]> {
        self.cycle_path.as_deref()
    }

    /// True if the plan schedules nothing
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_accessors() {
        let plan = ExecutionPlan::valid(
            vec![vec!["db".to_string()], vec!["api".to_string()]],
            vec!["db".to_string(), "api".to_string()],
        );

        assert_eq!(plan.total_levels(), 2);
        assert_eq!(plan.nodes_at_level(0), Some(&["db".to_string()][..]));
        assert_eq!(plan.nodes_at_level(1), Some(&["api".to_string()][..]));
        assert_eq!(plan.nodes_at_level(2), None);
        assert!(!plan.has_cycle());
        assert!(plan.cycle_path().is_none());
    }

    #[test]
    fn test_empty_plan() {
        let plan = ExecutionPlan::valid(Vec::new(), Vec::new());
        assert!(plan.is_empty());
        assert_eq!(plan.total_levels(), 0);
    }
}
