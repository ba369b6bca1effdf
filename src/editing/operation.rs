//! Structural edit steps

use crate::document::Node;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Address of a node: `[i]` is root child `i`, `[i, j]` is child `j` of the
/// container at root index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(pub SmallVec<[usize; 2]>);

impl NodePath {
    /// Root child at `index`
    pub fn root(index: usize) -> Self {
        Self(smallvec![index])
    }

    /// Child `index` of the container at root index `parent`
    pub fn child(parent: usize, index: usize) -> Self {
        Self(smallvec![parent, index])
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Index among siblings
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Root index of the parent container, for depth-2 paths
    pub fn parent(&self) -> Option<usize> {
        match self.0.as_slice() {
            [parent, _] => Some(*parent),
            _ => None,
        }
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// An atomic structural edit
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Insert a node so that it ends up at `path`
    Insert { path: NodePath, node: Node },
    /// Remove the node at `path`
    Delete { path: NodePath },
    /// Swap the node at `path` for another one
    Replace { path: NodePath, node: Node },
}

impl Step {
    /// Create an insert step at root level
    pub fn insert(index: usize, node: impl Into<Node>) -> Self {
        Self::Insert {
            path: NodePath::root(index),
            node: node.into(),
        }
    }

    /// Create a delete step at root level
    pub fn delete(index: usize) -> Self {
        Self::Delete {
            path: NodePath::root(index),
        }
    }

    /// Create a replace step at root level
    pub fn replace(index: usize, node: impl Into<Node>) -> Self {
        Self::Replace {
            path: NodePath::root(index),
            node: node.into(),
        }
    }

    pub fn path(&self) -> &NodePath {
        match self {
            Step::Insert { path, .. } | Step::Delete { path } | Step::Replace { path, .. } => path,
        }
    }
}
