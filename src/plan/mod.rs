//! Execution planning for dependency graphs
//!
//! This module turns a validated dependency graph into a leveled
//! execution plan: a topological ordering grouped into levels whose
//! members can run in parallel. The external dispatcher consumes levels
//! in order, waiting for every node in level N to reach a terminal
//! status before starting level N+1.

mod plan;
mod planner;

pub use plan::ExecutionPlan;
pub use planner::ExecutionPlanner;
