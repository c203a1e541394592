//! Process-id registry
//!
//! Configured as a nested TOML table whose leaves are process ids:
//!
//! ```toml
//! [process_ids]
//! ao = "0syT13r0s0tgPmIed95bJnuSqaD29HQNN8D3ElLSrsc"
//!
//! [process_ids.game]
//! main_process = "..."
//! [process_ids.game.shops]
//! item_shop = "..."
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A leaf id or a nested table of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessIdNode {
    Id(String),
    Group(BTreeMap<String, ProcessIdNode>),
}

/// A named process id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessIdEntry {
    pub name: String,
    pub value: String,
}

/// Entries under one top-level key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessIdGroup {
    pub name: String,
    pub ids: Vec<ProcessIdEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    roots: BTreeMap<String, ProcessIdNode>,
}

impl ProcessRegistry {
    pub fn new(roots: BTreeMap<String, ProcessIdNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Flatten into sorted display groups.
    pub fn groups(&self) -> Vec<ProcessIdGroup> {
        let mut groups = Vec::new();

        for (category, node) in &self.roots {
            let mut ids = match node {
                ProcessIdNode::Id(value) => vec![ProcessIdEntry {
                    name: category.clone(),
                    value: value.clone(),
                }],
                ProcessIdNode::Group(children) => {
                    let mut ids = Vec::new();
                    collect_entries(children, "", &mut ids);
                    ids
                }
            };

            if ids.is_empty() {
                continue;
            }

            ids.sort_by(|a, b| compare_names(&a.name, &b.name));
            groups.push(ProcessIdGroup {
                name: category.clone(),
                ids,
            });
        }

        groups.sort_by(|a, b| compare_names(&a.name, &b.name));
        groups
    }

    /// Look up an id by its dotted key path, e.g. `game.shops.item_shop`.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut parts = path.split('.');
        let mut node = self.roots.get(parts.next()?)?;

        for part in parts {
            match node {
                ProcessIdNode::Group(children) => node = children.get(part)?,
                ProcessIdNode::Id(_) => return None,
            }
        }

        match node {
            ProcessIdNode::Id(value) => Some(value.as_str()),
            ProcessIdNode::Group(_) => None,
        }
    }
}

fn collect_entries(
    children: &BTreeMap<String, ProcessIdNode>,
    prefix: &str,
    out: &mut Vec<ProcessIdEntry>,
) {
    for (key, node) in children {
        match node {
            ProcessIdNode::Id(value) => out.push(ProcessIdEntry {
                name: format!("{}{}", prefix, display_name(key)),
                value: value.clone(),
            }),
            ProcessIdNode::Group(nested) => {
                collect_entries(nested, &format!("{}{} > ", prefix, key), out);
            }
        }
    }
}

/// `item_shop` -> `Item Shop`
pub fn display_name(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Case-insensitive first, raw order as tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
