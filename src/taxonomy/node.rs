// 🌳 Category Node - One entry in the taxonomy tree
//
// A node owns its children, so a tree built from nodes is finite and
// acyclic by construction. Nodes are assembled once at load time and then
// only read.

use crate::tokenizer::CaseMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator used by every external format to join trigger terms.
pub const TRIGGER_SEPARATOR: char = '|';

/// Split a `|`-delimited trigger list into a set, dropping blanks.
pub fn parse_triggers(details: &str) -> BTreeSet<String> {
    details
        .split(TRIGGER_SEPARATOR)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a trigger set back into its `|`-delimited form.
pub fn join_triggers(triggers: &BTreeSet<String>) -> String {
    triggers
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Stable identity, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Display name, also the key results are aggregated under
    name: String,

    /// Exact-match trigger terms (empty for pure grouping nodes)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    triggers: BTreeSet<String>,

    /// Sub-categories in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        CategoryNode {
            id: None,
            name: name.into(),
            triggers: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(triggers.into_iter().map(Into::into));
        self
    }

    /// Add triggers from a `|`-delimited list such as `"vfinx|veurx"`.
    pub fn with_details(mut self, details: &str) -> Self {
        self.triggers.extend(parse_triggers(details));
        self
    }

    pub fn with_child(mut self, child: CategoryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = CategoryNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triggers(&self) -> &BTreeSet<String> {
        &self.triggers
    }

    pub fn children(&self) -> &[CategoryNode] {
        &self.children
    }

    /// Exact membership test against this node's trigger set.
    pub fn has_trigger(&self, token: &str) -> bool {
        self.triggers.contains(token)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::node_count).sum::<usize>()
    }

    /// Height of the subtree: a lone node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::depth).max().unwrap_or(0)
    }

    /// Total trigger terms across the subtree.
    pub fn trigger_count(&self) -> usize {
        self.triggers.len() + self.children.iter().map(CategoryNode::trigger_count).sum::<usize>()
    }

    /// First node named `name` in pre-order, including `self`.
    pub fn find(&self, name: &str) -> Option<&CategoryNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Copy of the subtree with triggers folded to the policy's canonical case.
    pub fn normalized(&self, case_mode: CaseMode) -> CategoryNode {
        CategoryNode {
            id: self.id.clone(),
            name: self.name.clone(),
            triggers: self.triggers.iter().map(|t| case_mode.normalize(t)).collect(),
            children: self
                .children
                .iter()
                .map(|child| child.normalized(case_mode))
                .collect(),
        }
    }

    /// Fill in missing ids with fresh UUIDs, recursively.
    pub(crate) fn assign_missing_ids(&mut self) {
        if self.id.is_none() {
            self.id = Some(uuid::Uuid::new_v4().to_string());
        }
        for child in &mut self.children {
            child.assign_missing_ids();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
