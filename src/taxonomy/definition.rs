// 📜 Taxonomy Definitions - External shapes a taxonomy arrives in
//
// Two shapes are accepted:
// - Nested: { id, name, details: "a|b|c", children: [...] } (JSON model)
// - Flat:   id, parent_id, name, triggers rows (CSV files, SQLite table)
//
// Both are validated and turned into a CategoryNode tree. Any structural
// problem is a ConfigurationError raised here, never during classification.

use crate::error::ConfigurationError;
use crate::taxonomy::node::{join_triggers, CategoryNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ============================================================================
// NESTED DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyDefinition {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Trigger terms joined with `|`
    #[serde(default)]
    pub details: String,

    #[serde(default)]
    pub children: Vec<TaxonomyDefinition>,
}

impl TaxonomyDefinition {
    /// Validate and convert into a tree. Blank ids get a fresh UUID.
    pub fn into_node(self) -> Result<CategoryNode, ConfigurationError> {
        let mut root = self.convert()?;
        root.assign_missing_ids();
        check_unique_ids(&root)?;
        warn_duplicate_names(&root);
        Ok(root)
    }

    fn convert(self) -> Result<CategoryNode, ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName { id: self.id });
        }

        let mut node = CategoryNode::new(self.name).with_details(&self.details);
        if !self.id.trim().is_empty() {
            node = node.with_id(self.id);
        }

        for child in self.children {
            node = node.with_child(child.convert()?);
        }

        Ok(node)
    }

    /// Render a tree back into the nested wire shape.
    pub fn from_node(node: &CategoryNode) -> Self {
        TaxonomyDefinition {
            id: node.id().unwrap_or_default().to_string(),
            name: node.name().to_string(),
            details: join_triggers(node.triggers()),
            children: node.children().iter().map(TaxonomyDefinition::from_node).collect(),
        }
    }
}

fn check_unique_ids(root: &CategoryNode) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Some(id) = node.id() {
            if !seen.insert(id) {
                return Err(ConfigurationError::DuplicateId(id.to_string()));
            }
        }
        stack.extend(node.children());
    }

    Ok(())
}

/// Names used by more than one category below the root, each listed once.
pub fn duplicate_names(root: &CategoryNode) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut stack: Vec<&CategoryNode> = root.children().iter().collect();

    while let Some(node) = stack.pop() {
        if !seen.insert(node.name()) && !duplicates.contains(&node.name()) {
            duplicates.push(node.name());
        }
        stack.extend(node.children());
    }

    duplicates
}

/// Results are keyed by name, so two categories sharing one would merge.
fn warn_duplicate_names(root: &CategoryNode) {
    for name in duplicate_names(root) {
        warn!(name, "duplicate category name; matches will be merged");
    }
}

// ============================================================================
// FLAT RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRecord {
    pub id: String,

    /// Empty / missing for the root
    #[serde(default)]
    pub parent_id: Option<String>,

    pub name: String,

    /// Trigger terms joined with `|`
    #[serde(default)]
    pub triggers: String,
}

impl TaxonomyRecord {
    fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// Assemble flat records into a tree rooted at the single parentless record.
///
/// Sibling order follows record order.
pub fn build_tree(records: &[TaxonomyRecord]) -> Result<CategoryNode, ConfigurationError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName { id: record.id.clone() });
        }
        if index.insert(record.id.as_str(), i).is_some() {
            return Err(ConfigurationError::DuplicateId(record.id.clone()));
        }
    }

    let mut roots = Vec::new();
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        match record.parent() {
            None => roots.push(i),
            Some(parent_id) => {
                if !index.contains_key(parent_id) {
                    return Err(ConfigurationError::UnknownParent {
                        id: record.id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                }
                children.entry(parent_id).or_default().push(i);
            }
        }
    }

    if roots.len() > 1 {
        return Err(ConfigurationError::MultipleRoots(
            roots.iter().map(|&i| records[i].id.clone()).collect(),
        ));
    }

    // Every record has a known parent, so anything the root cannot reach
    // sits on (or hangs off) a cycle.
    let mut reached = vec![false; records.len()];
    if let Some(&root) = roots.first() {
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            reached[i] = true;
            if let Some(kids) = children.get(records[i].id.as_str()) {
                stack.extend(kids.iter().copied());
            }
        }
    }

    if let Some(start) = reached.iter().position(|r| !r) {
        return Err(ConfigurationError::Cycle(cycle_from(records, &index, start)));
    }

    match roots.first() {
        Some(&root) => {
            let tree = assemble(records, &children, root);
            warn_duplicate_names(&tree);
            Ok(tree)
        }
        None => Err(ConfigurationError::MissingRoot),
    }
}

fn cycle_from(records: &[TaxonomyRecord], index: &HashMap<&str, usize>, start: usize) -> Vec<String> {
    let mut path: Vec<usize> = Vec::new();
    let mut current = start;

    loop {
        if let Some(pos) = path.iter().position(|&p| p == current) {
            let mut cycle: Vec<String> = path[pos..].iter().map(|&i| records[i].id.clone()).collect();
            cycle.push(records[current].id.clone());
            return cycle;
        }
        path.push(current);

        match records[current].parent().and_then(|p| index.get(p)) {
            Some(&parent) => current = parent,
            None => return path.iter().map(|&i| records[i].id.clone()).collect(),
        }
    }
}

fn assemble(records: &[TaxonomyRecord], children: &HashMap<&str, Vec<usize>>, i: usize) -> CategoryNode {
    let record = &records[i];
    let kids = children
        .get(record.id.as_str())
        .map(|kids| kids.iter().map(|&k| assemble(records, children, k)).collect::<Vec<_>>())
        .unwrap_or_default();

    CategoryNode::new(record.name.clone())
        .with_id(record.id.clone())
        .with_details(&record.triggers)
        .with_children(kids)
}

/// Flatten a tree into records in pre-order (root first, siblings in order).
///
/// Nodes without an id receive a fresh UUID so parent links can be written.
pub fn flatten(root: &CategoryNode) -> Vec<TaxonomyRecord> {
    let mut tree = root.clone();
    tree.assign_missing_ids();

    let mut records = Vec::with_capacity(tree.node_count());
    push_records(&tree, None, &mut records);
    records
}

fn push_records(node: &CategoryNode, parent_id: Option<&str>, out: &mut Vec<TaxonomyRecord>) {
    let id = node.id().unwrap_or_default().to_string();
    out.push(TaxonomyRecord {
        id: id.clone(),
        parent_id: parent_id.map(str::to_string),
        name: node.name().to_string(),
        triggers: join_triggers(node.triggers()),
    });

    for child in node.children() {
        push_records(child, Some(&id), out);
    }
}

// ============================================================================
// TESTS
// ============================================================================
