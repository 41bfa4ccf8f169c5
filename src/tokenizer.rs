// ✂️ Tokenizer - Raw text → normalized tokens
// Splits on punctuation/whitespace delimiters and drops English stop words.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// A single normalized fragment of input text.
pub type Token = String;

/// Characters that separate tokens.
pub const DELIMITERS: [char; 6] = [' ', ',', ';', '!', '?', '.'];

/// Common English function words that carry no classification signal.
pub const STOP_WORDS: &[&str] = &[
    "ourselves", "hers", "between", "yourself", "but", "again", "there", "about", "once", "during",
    "out", "very", "having", "with", "they", "own", "an", "be", "some", "for", "do", "its", "yours", "such",
    "into", "of", "most", "itself", "other", "off", "is", "s", "am", "or", "who", "as", "from", "him", "each",
    "the", "themselves", "until", "below", "are", "we", "these", "your", "his", "through", "don", "nor", "me",
    "were", "her", "more", "himself", "this", "down", "should", "our", "their", "while", "above", "both", "up",
    "to", "ours", "had", "she", "all", "no", "when", "at", "any", "before", "them", "same", "and", "been", "have",
    "in", "will", "on", "does", "yourselves", "then", "that", "because", "what", "over", "why", "so", "can", "did",
    "not", "now", "under", "he", "you", "herself", "has", "just", "where", "too", "only", "myself", "which", "those",
    "i", "after", "few", "whom", "t", "being", "if", "theirs", "my", "against", "a", "by", "doing", "it", "how",
    "further", "was", "here", "than",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Is `word` an exact (case-sensitive) member of the stop-word list?
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

// ============================================================================
// CASE POLICY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Tokens and triggers compared exactly as written
    #[default]
    Sensitive,

    /// Tokens and triggers both folded to lowercase before comparison
    Insensitive,
}

impl CaseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::Sensitive => "sensitive",
            CaseMode::Insensitive => "insensitive",
        }
    }

    /// Bring a term into the canonical case for this policy.
    pub fn normalize(&self, term: &str) -> String {
        match self {
            CaseMode::Sensitive => term.to_string(),
            CaseMode::Insensitive => term.to_lowercase(),
        }
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    case_mode: CaseMode,
}

impl Tokenizer {
    pub fn new(case_mode: CaseMode) -> Self {
        Tokenizer { case_mode }
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    /// Split `text` into tokens, dropping empties and stop words.
    ///
    /// Order is preserved and repeated tokens are kept, so each occurrence can
    /// be weighed later.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let normalized = self.case_mode.normalize(text);

        normalized
            .split(|c: char| DELIMITERS.contains(&c))
            .filter(|fragment| !fragment.is_empty())
            .filter(|fragment| !is_stop_word(fragment))
            .map(str::to_string)
            .collect()
    }
}

/// Canonical case-sensitive tokenization.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::default().tokenize(text)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_all_delimiters() {
        let tokens = tokenize("alpha,beta;gamma!delta?epsilon.zeta eta");
        assert_eq!(
            tokens,
            vec!["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"]
        );
    }

    #[test]
    fn test_consecutive_delimiters_produce_no_empty_tokens() {
        let tokens = tokenize("  vfinx,, ;;veurx!?.  ");
        assert_eq!(tokens, vec!["vfinx", "veurx"]);
    }

    #[test]
    fn test_removes_stop_words_and_keeps_order() {
        let tokens = tokenize("I bought VFINX and some veurx, then more VFINX!");
        assert_eq!(tokens, vec!["I", "bought", "VFINX", "veurx", "VFINX"]);
    }

    #[test]
    fn test_stop_words_are_case_sensitive_in_canonical_mode() {
        let tokens = tokenize("The the THE");
        assert_eq!(tokens, vec!["The", "THE"]);
    }

    #[test]
    fn test_consecutive_stop_words_all_removed() {
        // in-place removal while iterating would skip the second "the"
        let tokens = tokenize("the the the fund");
        assert_eq!(tokens, vec!["fund"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
        assert!(tokenize(" .,;!? ").is_empty());
    }

    #[test]
    fn test_no_output_token_is_a_stop_word() {
        let text = STOP_WORDS.join(" ") + " vtsax and the vbiix";
        let tokens = tokenize(&text);
        assert!(tokens.iter().all(|t| !is_stop_word(t)));
        assert_eq!(tokens, vec!["vtsax", "vbiix"]);
    }

    #[test]
    fn test_insensitive_mode_lowercases_and_filters() {
        let tokenizer = Tokenizer::new(CaseMode::Insensitive);
        let tokens = tokenizer.tokenize("I bought VFINX and The veurx");
        assert_eq!(tokens, vec!["bought", "vfinx", "veurx"]);
    }

    #[test]
    fn test_newlines_are_not_delimiters() {
        let tokens = tokenize("vfinx\nveurx");
        assert_eq!(tokens, vec!["vfinx\nveurx"]);
    }
}
