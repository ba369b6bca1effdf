//! Structural rules of the document tree
//!
//! Root level: leaves and containers. Inside a container: entries only.
//! An entry holds exactly a left slot then a right slot, each with at least
//! one block. How many containers exist, and where, is not a schema concern;
//! that is the transaction guard's job.

use crate::document::{Document, Node, OverrideEntry, SlotSide};
use crate::error::{PaginationError, Result};

/// Where a node is being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Root,
    Container,
}

/// Check that `node` may be placed under `parent`
pub fn check_placement(parent: Parent, node: &Node) -> Result<()> {
    match (parent, node) {
        (Parent::Root, Node::Leaf(_)) => Ok(()),
        (Parent::Root, Node::Container { children }) => {
            for child in children {
                check_placement(Parent::Container, child)?;
            }
            Ok(())
        }
        (Parent::Container, Node::Entry(entry)) => check_entry(entry),
        (parent, node) => Err(PaginationError::schema(format!(
            "{} node is not allowed under {:?}",
            node.type_name(),
            parent
        ))),
    }
}

/// Check slot order and the minimum content of each slot
pub fn check_entry(entry: &OverrideEntry) -> Result<()> {
    let [left, right] = &entry.slots;
    if left.side != SlotSide::Left || right.side != SlotSide::Right {
        return Err(PaginationError::schema(
            "entry slots must be ordered left, right",
        ));
    }
    if left.blocks.is_empty() || right.blocks.is_empty() {
        return Err(PaginationError::schema(
            "entry slots need at least one block",
        ));
    }
    Ok(())
}

/// Check every root child of `document`
pub fn check_document(document: &Document) -> Result<()> {
    for node in document.children() {
        check_placement(Parent::Root, node)?;
    }
    Ok(())
}
