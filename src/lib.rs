// Term Categorizer - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod tokenizer;
pub mod taxonomy;
pub mod traversal;
pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod config;
pub mod db;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use tokenizer::{tokenize, is_stop_word, CaseMode, Token, Tokenizer, DELIMITERS, STOP_WORDS};
pub use taxonomy::{
    build_tree, flatten, load_csv, load_json, load_sqlite,
    CategoryNode, TaxonomyDefinition, TaxonomyRecord, TaxonomySnapshot, TaxonomySource, TaxonomyStore,
};
pub use traversal::{traverse, TraversalStats};
pub use aggregator::{Aggregator, CategoryMatch, MatchedTerm};
pub use classifier::{classify, classify_tokens, Classifier};
pub use error::{ConfigurationError, InvalidTaxonomyError};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
