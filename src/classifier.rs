// 🏷️ Classifier - Tokenize → traverse → aggregate
//
// The free function `classify` is the canonical case-sensitive pipeline
// over any tree. `Classifier` pairs a case policy with a snapshot that was
// normalized for the same policy.

use crate::aggregator::{Aggregator, CategoryMatch};
use crate::error::InvalidTaxonomyError;
use crate::taxonomy::{CategoryNode, TaxonomySnapshot};
use crate::tokenizer::{CaseMode, Token, Tokenizer};
use crate::traversal::traverse;
use tracing::debug;

/// Classify `text` against the categories below `root`.
///
/// No match yields an empty vector. On an invalid tree nothing partial is
/// returned.
pub fn classify(text: &str, root: &CategoryNode) -> Result<Vec<CategoryMatch>, InvalidTaxonomyError> {
    classify_tokens(&crate::tokenizer::tokenize(text), root)
}

/// Run traversal + aggregation over an already tokenized input.
pub fn classify_tokens(tokens: &[Token], root: &CategoryNode) -> Result<Vec<CategoryMatch>, InvalidTaxonomyError> {
    let mut aggregator = Aggregator::new();
    let stats = traverse(root, tokens, &mut aggregator)?;

    debug!(
        tokens = tokens.len(),
        nodes_visited = stats.nodes_visited,
        hits = stats.hits,
        categories = aggregator.len(),
        "classification complete"
    );

    Ok(aggregator.into_matches())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    tokenizer: Tokenizer,
}

impl Classifier {
    pub fn new(case_mode: CaseMode) -> Self {
        Classifier {
            tokenizer: Tokenizer::new(case_mode),
        }
    }

    pub fn case_mode(&self) -> CaseMode {
        self.tokenizer.case_mode()
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokenizer.tokenize(text)
    }

    /// Tokens exactly as `classify` would see them against `snapshot`.
    ///
    /// The snapshot's triggers were folded for its own case mode, so that
    /// mode wins if it differs from ours.
    pub fn tokenize_for(&self, text: &str, snapshot: &TaxonomySnapshot) -> Vec<Token> {
        if snapshot.case_mode() == self.case_mode() {
            self.tokenize(text)
        } else {
            Tokenizer::new(snapshot.case_mode()).tokenize(text)
        }
    }

    /// Classify against a snapshot, tokenizing with `tokenize_for`.
    pub fn classify(&self, text: &str, snapshot: &TaxonomySnapshot) -> Result<Vec<CategoryMatch>, InvalidTaxonomyError> {
        classify_tokens(&self.tokenize_for(text, snapshot), snapshot.root())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index_funds() -> CategoryNode {
        CategoryNode::new("Vanguard").with_child(CategoryNode::new("Index Funds").with_details("vfinx|veurx"))
    }

    fn single(name: &str, total: u32, terms: &[(&str, u32)]) -> Vec<CategoryMatch> {
        vec![CategoryMatch {
            name: name.to_string(),
            total_weight: total,
            matched: terms
                .iter()
                .map(|(value, weight)| crate::aggregator::MatchedTerm {
                    value: value.to_string(),
                    weight: *weight,
                })
                .collect(),
        }]
    }

    #[test]
    fn test_exact_case_matching() {
        let result = classify("I bought VFINX and some veurx, then more VFINX!", &index_funds()).unwrap();
        assert_eq!(result, single("Index Funds", 1, &[("veurx", 1)]));
    }

    #[test]
    fn test_repeated_term_weight() {
        let result = classify("veurx veurx veurx", &index_funds()).unwrap();
        assert_eq!(result, single("Index Funds", 3, &[("veurx", 3)]));
    }

    #[test]
    fn test_empty_text_is_empty_result() {
        assert!(classify("", &index_funds()).unwrap().is_empty());
        assert!(classify("   ", &index_funds()).unwrap().is_empty());
    }

    #[test]
    fn test_nested_child_only() {
        let root = CategoryNode::new("Root").with_child(
            CategoryNode::new("Funds").with_child(CategoryNode::new("Bond Funds").with_details("vbmfx")),
        );

        let result = classify("moved cash into vbmfx", &root).unwrap();
        assert_eq!(result, single("Bond Funds", 1, &[("vbmfx", 1)]));
    }

    #[test]
    fn test_root_triggers_ignored() {
        let root = CategoryNode::new("Vanguard")
            .with_details("vanguard")
            .with_child(CategoryNode::new("Index Funds").with_details("vfinx"));

        assert!(classify("vanguard vanguard", &root).unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        assert_eq!(classify("nothing relevant here", &index_funds()), Ok(vec![]));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let root = CategoryNode::new("Root")
            .with_child(CategoryNode::new("A").with_details("x|y"))
            .with_child(CategoryNode::new("B").with_details("y|z"));
        let text = "z y x y z x";

        let first = classify(text, &root).unwrap();
        for _ in 0..10 {
            assert_eq!(classify(text, &root).unwrap(), first);
        }
    }

    #[test]
    fn test_weights_equal_token_occurrences() {
        let root = CategoryNode::new("Root").with_child(CategoryNode::new("Index").with_details("vfinx|veurx|vtsax"));
        let text = "vfinx, vtsax; vfinx! veurx? vfinx. vtsax";
        let tokens = crate::tokenizer::tokenize(text);

        let result = classify(text, &root).unwrap();
        for term in &result[0].matched {
            let occurrences = tokens.iter().filter(|t| **t == term.value).count() as u32;
            assert_eq!(term.weight, occurrences);
        }
        assert_eq!(result[0].total_weight, tokens.len() as u32);
    }

    #[test]
    fn test_invalid_taxonomy_returns_no_partial_result() {
        let dup = CategoryNode::new("Dup").with_id("same").with_details("x");
        let root = CategoryNode::new("Root")
            .with_child(CategoryNode::new("Other").with_details("x"))
            .with_child(dup.clone())
            .with_child(dup);

        assert!(classify("x", &root).is_err());
    }

    #[test]
    fn test_insensitive_classifier_folds_case() {
        let snapshot = TaxonomySnapshot::new(&index_funds(), CaseMode::Insensitive, "test");
        let classifier = Classifier::new(CaseMode::Insensitive);

        let result = classifier
            .classify("I bought VFINX and some veurx, then more VFINX!", &snapshot)
            .unwrap();
        assert_eq!(result, single("Index Funds", 3, &[("vfinx", 2), ("veurx", 1)]));
    }

    #[test]
    fn test_classifier_follows_snapshot_case_mode() {
        let snapshot = TaxonomySnapshot::new(&index_funds(), CaseMode::Insensitive, "test");
        let classifier = Classifier::new(CaseMode::Sensitive);

        let result = classifier.classify("VFINX", &snapshot).unwrap();
        assert_eq!(result, single("Index Funds", 1, &[("vfinx", 1)]));
    }

    #[test]
    fn test_tokens_shown_match_tokens_classified() {
        let snapshot = TaxonomySnapshot::new(&index_funds(), CaseMode::Insensitive, "test");
        let classifier = Classifier::new(CaseMode::Sensitive);
        let text = "VFINX and The VEURX";

        let tokens = classifier.tokenize_for(text, &snapshot);
        assert_eq!(tokens, vec!["vfinx", "veurx"]);
        assert_ne!(tokens, classifier.tokenize(text));

        let result = classifier.classify(text, &snapshot).unwrap();
        let matched: Vec<&str> = result[0].matched.iter().map(|t| t.value.as_str()).collect();
        assert!(matched.iter().all(|value| tokens.iter().any(|t| t == value)));
        assert_eq!(result[0].total_weight, tokens.len() as u32);
    }

    #[test]
    fn test_sensitive_classifier_matches_free_function() {
        let snapshot = TaxonomySnapshot::new(&index_funds(), CaseMode::Sensitive, "test");
        let text = "VFINX veurx vfinx";
        assert_eq!(
            Classifier::default().classify(text, &snapshot).unwrap(),
            classify(text, &index_funds()).unwrap()
        );
    }
}
