use core::fmt::Display;

use crate::prelude_internal::*;

/// The key of a node within its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    /// Position within a collection
    Index(usize),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Result<Self, KeyError> {
        let name = name.into();
        if name.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Key::Name(name))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{name}"),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl TryFrom<&str> for Key {
    type Error = KeyError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Key::name(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Namespace,
    Collection,
    Field,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Collection => "namespace collection",
            NodeKind::Field => "field",
        }
    }
}

/// An immutable link in the ancestor chain of the form tree.
///
/// Structural owners (namespaces, fields) each hold an `Rc<Node>`; children
/// point at their parent's node, so addressing never needs a reference back
/// into the mutable tree.
#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    key: Key,
    kind: NodeKind,
    parent: Option<Rc<Node>>,
}

impl Node {
    pub fn root(key: Key, kind: NodeKind) -> Rc<Node> {
        Rc::new(Node {
            key,
            kind,
            parent: None,
        })
    }

    pub fn child(self: &Rc<Self>, key: Key, kind: NodeKind) -> Rc<Node> {
        Rc::new(Node {
            key,
            kind,
            parent: Some(Rc::clone(self)),
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&Node> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Ancestors from the root down to and including this node.
    pub fn lineage(&self) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            chain.push(node);
            current = node.parent();
        }
        chain.reverse();
        chain
    }

    pub fn root_node(&self) -> &Node {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }
}
