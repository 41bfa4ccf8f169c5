// 📸 Taxonomy Snapshot - Immutable, versioned view of the taxonomy
//
// A snapshot is never mutated. Reloading builds a new snapshot and swaps
// the shared pointer, so classifications already holding an Arc keep
// walking the tree they started with.

use crate::taxonomy::node::CategoryNode;
use crate::tokenizer::CaseMode;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TaxonomySnapshot {
    /// Tree with triggers already folded to `case_mode`
    root: CategoryNode,

    case_mode: CaseMode,

    /// Monotonic per store, starting at 1
    pub version: u64,

    /// SHA-256 over the canonical JSON of the tree
    pub fingerprint: String,

    /// Where the tree came from (e.g. "builtin", a file path)
    pub source: String,

    pub loaded_at: DateTime<Utc>,
}

impl TaxonomySnapshot {
    pub fn new(root: &CategoryNode, case_mode: CaseMode, source: impl Into<String>) -> Self {
        Self::with_version(root, case_mode, source, 1)
    }

    fn with_version(root: &CategoryNode, case_mode: CaseMode, source: impl Into<String>, version: u64) -> Self {
        let root = root.normalized(case_mode);
        let fingerprint = fingerprint(&root);

        TaxonomySnapshot {
            root,
            case_mode,
            version,
            fingerprint,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn root(&self) -> &CategoryNode {
        &self.root
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    /// Categories below the root (the root itself is never matched).
    pub fn category_count(&self) -> usize {
        self.root.node_count() - 1
    }
}

/// Content hash of a tree; equal trees always hash equal.
pub fn fingerprint(root: &CategoryNode) -> String {
    let mut hasher = Sha256::new();
    // Serializing plain strings, sets and vectors cannot fail
    let canonical = serde_json::to_vec(root).unwrap_or_default();
    hasher.update(&canonical);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// STORE
// ============================================================================

/// Holder of the current snapshot with copy-on-write replacement.
pub struct TaxonomyStore {
    current: RwLock<Arc<TaxonomySnapshot>>,
}

impl TaxonomyStore {
    pub fn new(snapshot: TaxonomySnapshot) -> Self {
        TaxonomyStore {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in force right now.
    pub fn current(&self) -> Arc<TaxonomySnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Build a snapshot from `root` and make it current. Returns the new one.
    pub fn replace(&self, root: &CategoryNode, source: impl Into<String>) -> Arc<TaxonomySnapshot> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = Arc::new(TaxonomySnapshot::with_version(
            root,
            guard.case_mode,
            source,
            guard.version + 1,
        ));

        info!(
            version = next.version,
            fingerprint = %next.fingerprint,
            source = %next.source,
            categories = next.category_count(),
            "taxonomy snapshot replaced"
        );

        *guard = Arc::clone(&next);
        next
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::builtin;

    #[test]
    fn test_snapshot_normalizes_for_insensitive_mode() {
        let root = CategoryNode::new("Root").with_child(CategoryNode::new("Index").with_triggers(["VFINX"]));
        let snapshot = TaxonomySnapshot::new(&root, CaseMode::Insensitive, "test");

        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.case_mode(), CaseMode::Insensitive);
        assert!(snapshot.root().children()[0].has_trigger("vfinx"));
        assert_eq!(snapshot.category_count(), 1);
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = builtin::vanguard();
        let b = builtin::vanguard();
        let c = CategoryNode::new("Other");

        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&c));
        assert_eq!(fingerprint(&a).len(), 64);
    }

    #[test]
    fn test_store_replace_bumps_version_and_keeps_old_arc() {
        let store = TaxonomyStore::new(TaxonomySnapshot::new(&builtin::vanguard(), CaseMode::Sensitive, "builtin"));
        let before = store.current();

        let replacement = CategoryNode::new("Root").with_child(CategoryNode::new("Bonds").with_details("vbmfx"));
        let after = store.replace(&replacement, "reload");

        assert_eq!(after.version, 2);
        assert_eq!(store.current().version, 2);
        assert_eq!(store.current().source, "reload");
        assert_ne!(before.fingerprint, after.fingerprint);

        // in-flight holders still see the old tree
        assert_eq!(before.version, 1);
        assert_eq!(before.root().children()[0].name(), "Index Funds");
    }

    #[test]
    fn test_store_replace_keeps_case_mode() {
        let store = TaxonomyStore::new(TaxonomySnapshot::new(&CategoryNode::new("R"), CaseMode::Insensitive, "a"));
        let next = store.replace(
            &CategoryNode::new("R").with_child(CategoryNode::new("X").with_triggers(["ABC"])),
            "b",
        );
        assert_eq!(next.case_mode(), CaseMode::Insensitive);
        assert!(next.root().children()[0].has_trigger("abc"));
    }
}
