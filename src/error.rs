// 🚨 Error Types - Load-time and traversal-time failures
//
// Two failure classes exist:
// - ConfigurationError: the taxonomy source is malformed (caught at load)
// - InvalidTaxonomyError: a node was reached twice while walking the tree
//
// Everything else (IO, CSV, SQLite) flows through anyhow with context.

use thiserror::Error;

// ============================================================================
// LOAD-TIME ERRORS
// ============================================================================

/// A taxonomy definition that cannot be turned into a well-formed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("category {id:?} has an empty name")]
    EmptyName { id: String },

    #[error("duplicate category id {0:?}")]
    DuplicateId(String),

    #[error("taxonomy has no root category (every record has a parent)")]
    MissingRoot,

    #[error("taxonomy has multiple root categories: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    #[error("category {id:?} references unknown parent {parent_id:?}")]
    UnknownParent { id: String, parent_id: String },

    #[error("cycle in category hierarchy: {}", .0.join(" → "))]
    Cycle(Vec<String>),
}

// ============================================================================
// TRAVERSAL ERRORS
// ============================================================================

/// Raised when the walk reaches the same node identity twice.
///
/// A tree built by the loaders can never trigger this; it guards trees that
/// were assembled by hand and reuse an id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid taxonomy: category {name:?} (id {id:?}) is reachable more than once")]
pub struct InvalidTaxonomyError {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = ConfigurationError::Cycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "cycle in category hierarchy: a → b → a");
    }

    #[test]
    fn test_configuration_error_converts_to_anyhow() {
        let err: anyhow::Error = ConfigurationError::MissingRoot.into();
        assert!(err.to_string().contains("no root category"));
    }
}
