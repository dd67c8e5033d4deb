//! Validation result aggregation
//!
//! A validation pass surfaces every problem it finds at once rather
//! than failing fast on the first, so findings are aggregated into a
//! result value instead of being raised as errors.

use serde::{Deserialize, Serialize};

/// Aggregated findings from a validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Blocking problems; the graph must not be executed while any
    /// are present
    pub errors: Vec<String>,
    /// Non-blocking findings, e.g. deep dependency chains
    pub warnings: Vec<String>,
    /// Every detected cycle as an ordered ID sequence returning to its
    /// starting node
    pub cycles: Vec<Vec<String>>,
}

impl ValidationResult {
    /// Returns true iff no blocking errors were found.
    ///
    /// Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_follows_errors_only() {
        let mut result = ValidationResult::default();
        assert!(result.is_valid());

        result.warning("deep chain");
        assert!(result.is_valid());

        result.error("dangling reference");
        assert!(!result.is_valid());
    }
}
