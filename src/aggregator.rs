// ⚖️ Aggregator - Fold (category, term) hits into weighted matches
//
// Categories appear in first-discovery order and are never reordered.
// Repeated hits grow weights instead of adding duplicate entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One trigger term confirmed in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTerm {
    pub value: String,

    /// How many times the term was confirmed
    pub weight: u32,
}

/// One category with at least one confirmed term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub name: String,

    /// Always the sum of `matched[..].weight`
    pub total_weight: u32,

    pub matched: Vec<MatchedTerm>,
}

impl CategoryMatch {
    fn first(name: &str, value: &str) -> Self {
        CategoryMatch {
            name: name.to_string(),
            total_weight: 1,
            matched: vec![MatchedTerm {
                value: value.to_string(),
                weight: 1,
            }],
        }
    }

    fn hit(&mut self, value: &str) {
        match self.matched.iter_mut().find(|term| term.value == value) {
            Some(term) => term.weight += 1,
            None => self.matched.push(MatchedTerm {
                value: value.to_string(),
                weight: 1,
            }),
        }
        self.total_weight += 1;
    }

    pub fn weight_of(&self, value: &str) -> Option<u32> {
        self.matched.iter().find(|term| term.value == value).map(|term| term.weight)
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

#[derive(Debug, Default)]
pub struct Aggregator {
    matches: Vec<CategoryMatch>,

    /// Category name → position in `matches`
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `value` confirmed the category `category_name`.
    pub fn record(&mut self, category_name: &str, value: &str) {
        match self.index.get(category_name) {
            Some(&pos) => self.matches[pos].hit(value),
            None => {
                self.index.insert(category_name.to_string(), self.matches.len());
                self.matches.push(CategoryMatch::first(category_name, value));
            }
        }
    }

    pub fn matches(&self) -> &[CategoryMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn into_matches(self) -> Vec<CategoryMatch> {
        self.matches
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_totals_consistent(matches: &[CategoryMatch]) {
        for m in matches {
            let sum: u32 = m.matched.iter().map(|t| t.weight).sum();
            assert_eq!(m.total_weight, sum, "total mismatch for {}", m.name);
        }
    }

    #[test]
    fn test_first_hit_creates_category() {
        let mut agg = Aggregator::new();
        agg.record("Index Funds", "veurx");

        assert_eq!(
            agg.into_matches(),
            vec![CategoryMatch {
                name: "Index Funds".into(),
                total_weight: 1,
                matched: vec![MatchedTerm {
                    value: "veurx".into(),
                    weight: 1
                }],
            }]
        );
    }

    #[test]
    fn test_repeated_term_increments_weight() {
        let mut agg = Aggregator::new();
        for _ in 0..3 {
            agg.record("Index Funds", "veurx");
        }

        let matches = agg.into_matches();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].total_weight, 3);
        assert_eq!(matches[0].matched.len(), 1);
        assert_eq!(matches[0].weight_of("veurx"), Some(3));
    }

    #[test]
    fn test_new_term_appends_to_existing_category() {
        let mut agg = Aggregator::new();
        agg.record("Index Funds", "veurx");
        agg.record("Index Funds", "vfinx");
        agg.record("Index Funds", "veurx");

        let matches = agg.into_matches();
        let values: Vec<&str> = matches[0].matched.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["veurx", "vfinx"]);
        assert_eq!(matches[0].total_weight, 3);
        assert_totals_consistent(&matches);
    }

    #[test]
    fn test_categories_keep_discovery_order() {
        let mut agg = Aggregator::new();
        agg.record("Bonds", "vbmfx");
        agg.record("Index", "vfinx");
        agg.record("Bonds", "vbltx");
        agg.record("ETFs", "voo");

        let names: Vec<String> = agg.matches().iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["Bonds", "Index", "ETFs"]);
        assert_eq!(agg.len(), 3);
        assert_totals_consistent(agg.matches());
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = Aggregator::new();
        assert!(agg.is_empty());
        assert!(agg.into_matches().is_empty());
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let mut agg = Aggregator::new();
        agg.record("Index Funds", "veurx");

        let json = serde_json::to_value(agg.matches()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "Index Funds", "total_weight": 1, "matched": [{"value": "veurx", "weight": 1}]}
            ])
        );
    }
}
