//! Validation and cycle detection for dependency graphs
//!
//! This module provides read-only analysis over the graph store:
//! structural consistency checks, exhaustive cycle enumeration,
//! dependency-depth bounding, and completeness checks, plus advisory
//! pre-flight helpers for callers who want to reject a mutation before
//! committing it.
//!
//! Findings are aggregated into a [`ValidationResult`] rather than
//! raised as errors; a single pass reports every problem at once.

mod config;
mod result;
mod validator;

pub use config::{RequiredField, ValidationConfig};
pub use result::ValidationResult;
pub use validator::Validator;

pub(crate) use validator::find_cycles;
