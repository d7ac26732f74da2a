//! DOM id and submission name resolution.

use crate::prelude_internal::*;

/// The `id`/`name` pair of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomPath {
    pub id: String,
    pub name: String,
}

impl DomPath {
    pub fn resolve(node: &Node) -> Self {
        DomPath {
            id: resolve_id(node),
            name: resolve_name(node),
        }
    }

    /// The name annotated with a trailing `[]`, added at most once.
    pub fn multiple_name(&self) -> String {
        if self.name.ends_with("[]") {
            self.name.clone()
        } else {
            format!("{}[]", self.name)
        }
    }

    /// The name with one trailing `[]` removed.
    pub fn single_name(&self) -> &str {
        self.name.strip_suffix("[]").unwrap_or(&self.name)
    }
}

/// Keys joined by `_`, lower-cased, with everything but letters and digits
/// folded to `_`.
pub fn resolve_id(node: &Node) -> String {
    let joined = node
        .lineage()
        .iter()
        .map(|node| node.key().to_string())
        .collect::<Vec<_>>()
        .join("_");
    joined
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec!['_']
            }
        })
        .collect()
}

/// The root key followed by one `[key]` per descendant.
///
/// Children of a field (positional expansions of an array value) contribute
/// `[]` instead, since their parent's value is already the array.
pub fn resolve_name(node: &Node) -> String {
    let lineage = node.lineage();
    let mut name = String::new();
    for (i, current) in lineage.iter().enumerate() {
        if i == 0 {
            name.push_str(&current.key().to_string());
            continue;
        }
        match current.parent().map(Node::kind) {
            Some(NodeKind::Field) => name.push_str("[]"),
            _ => {
                name.push('[');
                name.push_str(&current.key().to_string());
                name.push(']');
            }
        }
    }
    name
}
