//! Validation configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node fields the completeness check can require to be non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredField {
    /// The node ID
    Id,
    /// The human-readable name
    Name,
    /// The tenant/cluster scope
    Workspace,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Workspace => "workspace",
        };
        write!(f, "{}", s)
    }
}

/// Configuration for the validator
///
/// The defaults match what a fleet rollout wants: self-references are
/// structural errors, chains deeper than 50 draw a warning, and every
/// node must carry an ID and a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Treat self-references as warnings instead of errors
    pub allow_self_reference: bool,
    /// Longest dependency chain tolerated before a warning is issued
    pub max_dependency_depth: usize,
    /// Fields that must be non-empty on every node
    pub required_fields: Vec<RequiredField>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_self_reference: false,
            max_dependency_depth: 50,
            required_fields: vec![RequiredField::Id, RequiredField::Name],
        }
    }
}
