// 🧭 Traversal Engine - Stack-based walk of the taxonomy
//
// Visit order is LIFO: the root's children are pushed in declared order,
// the most recently pushed node is popped and tested, then its children
// are pushed. The last sibling is therefore walked (with its whole
// subtree) first. Result ordering depends on this, so it must not be
// swapped for a breadth-first or recursive pre-order walk.

use crate::aggregator::Aggregator;
use crate::error::InvalidTaxonomyError;
use crate::taxonomy::CategoryNode;
use crate::tokenizer::Token;
use std::collections::HashSet;

/// Summary of one walk, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub hits: usize,
}

/// Walk every node under `root` (not `root` itself) and report each
/// (node, token) match to `aggregator`.
///
/// Every token is tested independently, so a token appearing three times
/// is reported three times. A node id seen twice aborts the walk.
pub fn traverse(
    root: &CategoryNode,
    tokens: &[Token],
    aggregator: &mut Aggregator,
) -> Result<TraversalStats, InvalidTaxonomyError> {
    let mut stats = TraversalStats::default();
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&CategoryNode> = root.children().iter().collect();

    while let Some(node) = stack.pop() {
        if let Some(id) = node.id() {
            if !seen_ids.insert(id) {
                return Err(InvalidTaxonomyError {
                    id: id.to_string(),
                    name: node.name().to_string(),
                });
            }
        }
        stats.nodes_visited += 1;

        if !node.triggers().is_empty() {
            for token in tokens {
                if node.has_trigger(token) {
                    aggregator.record(node.name(), token);
                    stats.hits += 1;
                }
            }
        }

        stack.extend(node.children());
    }

    Ok(stats)
}

// ============================================================================
// TESTS
// ============================================================================
