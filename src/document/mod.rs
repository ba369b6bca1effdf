//! Document model: a shallow tree of content blocks plus the override store

mod block;
pub mod fragment;
mod node;
pub mod schema;
pub mod walk;

pub use block::{Block, BlockKind, ListMarker};
pub use node::{ContentSlot, EntryAttrs, Node, OverrideEntry, PageSelector, RegionKind, SlotSide};

use crate::editing::{NodePath, Step};
use crate::error::{PaginationError, Result};
use schema::Parent;
use serde::{Deserialize, Serialize};

/// The main document structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Root-level nodes in order
    #[serde(rename = "content")]
    children: Vec<Node>,
    /// Monotonic version counter
    #[serde(default)]
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_nodes(vec![Node::Leaf(Block::empty())])
    }

    /// Create a document from root nodes as given
    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self {
            children,
            version: 0,
        }
    }

    /// Create a document from initial text, one paragraph per line
    pub fn from_text(text: &str) -> Self {
        let children = text
            .split('\n')
            .map(|line| Node::Leaf(Block::paragraph(line)))
            .collect();
        Self::from_nodes(children)
    }

    /// Parse a persisted document, rejecting schema violations
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(json)?;
        schema::check_document(&document)?;
        Ok(document)
    }

    /// Serialize the document, override store included
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Number of root-level nodes
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf blocks in document order, skipping the override store
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.children.iter().filter_map(Node::as_leaf)
    }

    /// Get the full document text, one line per block
    pub fn text(&self) -> String {
        self.blocks()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The override container, when it sits where it belongs
    pub fn override_container(&self) -> Option<&Node> {
        self.first_child().filter(|node| node.is_container())
    }

    /// Entries of the override container at index 0
    pub fn override_entries(&self) -> impl Iterator<Item = &OverrideEntry> + '_ {
        self.override_container()
            .map(Node::children)
            .unwrap_or(&[])
            .iter()
            .filter_map(Node::as_entry)
    }

    /// Get the node at `path`
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        match path.0.as_slice() {
            [index] => self.children.get(*index),
            [parent, index] => self.children.get(*parent)?.children().get(*index),
            _ => None,
        }
    }

    /// Sibling list that `path` points into, with the schema parent kind
    fn siblings_mut(&mut self, path: &NodePath) -> Result<(&mut Vec<Node>, Parent)> {
        match path.0.as_slice() {
            [_] => Ok((&mut self.children, Parent::Root)),
            [parent, _] => self
                .children
                .get_mut(*parent)
                .and_then(Node::children_mut)
                .map(|children| (children, Parent::Container))
                .ok_or_else(|| PaginationError::InvalidPath { path: path.to_vec() }),
            _ => Err(PaginationError::InvalidPath { path: path.to_vec() }),
        }
    }

    /// Compute the step that undoes `step` against the current state
    pub fn compute_inverse(&self, step: &Step) -> Result<Step> {
        let missing = || PaginationError::InvalidPath {
            path: step.path().to_vec(),
        };
        match step {
            Step::Insert { path, .. } => Ok(Step::Delete { path: path.clone() }),
            Step::Delete { path } => {
                let node = self.node_at(path).ok_or_else(missing)?;
                Ok(Step::Insert {
                    path: path.clone(),
                    node: node.clone(),
                })
            }
            Step::Replace { path, .. } => {
                let node = self.node_at(path).ok_or_else(missing)?;
                Ok(Step::Replace {
                    path: path.clone(),
                    node: node.clone(),
                })
            }
        }
    }

    /// Apply a step. On error the document is left unchanged.
    pub fn apply_step(&mut self, step: Step) -> Result<()> {
        let path = step.path().clone();
        let invalid = || PaginationError::InvalidPath { path: path.to_vec() };
        let index = path.index().ok_or_else(invalid)?;
        let (siblings, parent) = self.siblings_mut(&path)?;

        match step {
            Step::Insert { node, .. } => {
                schema::check_placement(parent, &node)?;
                if index > siblings.len() {
                    return Err(invalid());
                }
                siblings.insert(index, node);
            }
            Step::Delete { .. } => {
                if index >= siblings.len() {
                    return Err(invalid());
                }
                siblings.remove(index);
            }
            Step::Replace { node, .. } => {
                schema::check_placement(parent, &node)?;
                let slot = siblings.get_mut(index).ok_or_else(invalid)?;
                *slot = node;
            }
        }

        self.version += 1;
        Ok(())
    }
}
