// Taxonomy Model
//
// The tree of categories text is classified against:
// - node:       CategoryNode, the read-only tree itself
// - definition: external shapes (nested JSON, flat records) and validation
// - loader:     reading a tree from builtin/JSON/CSV/SQLite sources
// - snapshot:   immutable versioned view + copy-on-write store
// - builtin:    the default Vanguard model

pub mod builtin;
pub mod definition;
pub mod loader;
pub mod node;
pub mod snapshot;

pub use definition::{build_tree, duplicate_names, flatten, TaxonomyDefinition, TaxonomyRecord};
pub use loader::{load_csv, load_json, load_sqlite, parse_json, TaxonomySource};
pub use node::{parse_triggers, CategoryNode, TRIGGER_SEPARATOR};
pub use snapshot::{fingerprint, TaxonomySnapshot, TaxonomyStore};
