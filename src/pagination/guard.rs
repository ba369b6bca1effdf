//! Keeps the override container single and at the front of the document
//!
//! The guard runs after every document-changing transaction and appends its
//! repair steps to that same transaction, so downstream pagination never sees
//! a missing or duplicated container and the repair shares the undo entry of
//! the edit that caused it.

use crate::document::walk::{self, NodeMatch};
use crate::document::Document;
use crate::editing::Transaction;
use crate::error::Result;

/// Structural state of the override container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    NoContainer,
    SingleCanonicalContainer,
    /// Duplicated or not at index 0; repaired within the same transaction
    MultipleOrMisplaced,
}

impl ContainerState {
    pub fn of(document: &Document) -> Self {
        let containers = walk::find_containers(document);
        match containers.as_slice() {
            [] => ContainerState::NoContainer,
            [only] if only.index == 0 => ContainerState::SingleCanonicalContainer,
            _ => ContainerState::MultipleOrMisplaced,
        }
    }
}

/// Enforces the single-container invariant
pub struct TransactionGuard;

impl TransactionGuard {
    /// Build the repair for a batch of transactions that turned `old` into
    /// `new`.
    ///
    /// Returns `None` when nothing changed the document or the container is
    /// already where it belongs.
    pub fn append_transaction(
        transactions: &[&Transaction],
        old: &Document,
        new: &Document,
    ) -> Result<Option<Transaction>> {
        if !transactions.iter().any(|tr| tr.doc_changed()) {
            return Ok(None);
        }

        let containers = walk::find_containers(new);
        match containers.as_slice() {
            [] => {
                let Some(previous) = old.override_container() else {
                    return Ok(None);
                };
                log::debug!("override container removed by an edit; restoring it");
                let mut tr = Transaction::new(new).with_description("restore override container");
                tr.insert(0, previous.clone())?;
                Ok(Some(tr))
            }
            [only] if only.index == 0 => Ok(None),
            found => Self::canonicalize(new, found),
        }
    }

    /// Build the repair for a document loaded from outside the editor.
    ///
    /// Only a duplicated or misplaced container is repaired; a document
    /// without one is left alone.
    pub fn normalize(document: &Document) -> Result<Option<Transaction>> {
        let containers = walk::find_containers(document);
        match containers.as_slice() {
            [] => Ok(None),
            [only] if only.index == 0 => Ok(None),
            found => Self::canonicalize(document, found),
        }
    }

    fn canonicalize(document: &Document, found: &[NodeMatch<'_>]) -> Result<Option<Transaction>> {
        let Some(canonical) = walk::most_populated(found) else {
            return Ok(None);
        };
        log::debug!(
            "{} override containers found; keeping the one at {} with {} entries",
            found.len(),
            canonical.index,
            canonical.node.child_count()
        );
        let canonical = canonical.node.clone();
        let mut tr = Transaction::new(document).with_description("normalize override container");
        for NodeMatch { index, .. } in found.iter().rev() {
            tr.delete(*index)?;
        }
        tr.insert(0, canonical)?;
        Ok(Some(tr))
    }

    /// Run the guard on `tr` and fold any repair into it
    pub fn enforce(tr: &mut Transaction) -> Result<()> {
        let repair = Self::append_transaction(&[&*tr], tr.before(), tr.doc())?;
        if let Some(repair) = repair {
            tr.append(repair);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Node, OverrideEntry, PageSelector, RegionKind};

    fn entry(page: u32) -> Node {
        Node::Entry(OverrideEntry::new(
            RegionKind::Footer,
            PageSelector::Page(page),
            vec![Block::empty()],
            vec![Block::paragraph(page.to_string())],
        ))
    }

    fn container(pages: &[u32]) -> Node {
        Node::Container {
            children: pages.iter().map(|p| entry(*p)).collect(),
        }
    }

    fn leaf(text: &str) -> Node {
        Node::Leaf(Block::paragraph(text))
    }

    #[test]
    fn test_state_classification() {
        assert_eq!(ContainerState::of(&Document::new()), ContainerState::NoContainer);
        let doc = Document::from_nodes(vec![container(&[]), leaf("a")]);
        assert_eq!(ContainerState::of(&doc), ContainerState::SingleCanonicalContainer);
        let doc = Document::from_nodes(vec![leaf("a"), container(&[])]);
        assert_eq!(ContainerState::of(&doc), ContainerState::MultipleOrMisplaced);
    }

    #[test]
    fn test_canonical_document_needs_no_repair() {
        let doc = Document::from_nodes(vec![container(&[1]), leaf("a")]);
        let mut tr = Transaction::new(&doc);
        tr.insert(2, Block::paragraph("b")).unwrap();
        let repair = TransactionGuard::append_transaction(&[&tr], tr.before(), tr.doc()).unwrap();
        assert!(repair.is_none());
    }

    #[test]
    fn test_unchanged_batch_is_ignored() {
        let doc = Document::from_nodes(vec![leaf("a"), container(&[1]), container(&[])]);
        let tr = Transaction::new(&doc);
        let repair = TransactionGuard::append_transaction(&[&tr], &doc, &doc).unwrap();
        assert!(repair.is_none());
    }

    #[test]
    fn test_deleted_container_is_restored() {
        let doc = Document::from_nodes(vec![container(&[1, 2]), leaf("a")]);
        let mut tr = Transaction::new(&doc);
        tr.delete(0).unwrap();
        TransactionGuard::enforce(&mut tr).unwrap();

        assert_eq!(ContainerState::of(tr.doc()), ContainerState::SingleCanonicalContainer);
        assert_eq!(tr.doc().override_entries().count(), 2);
        assert_eq!(tr.doc().text(), "a");
    }

    #[test]
    fn test_no_container_before_or_after() {
        let doc = Document::from_text("a");
        let mut tr = Transaction::new(&doc);
        tr.insert(1, Block::paragraph("b")).unwrap();
        TransactionGuard::enforce(&mut tr).unwrap();
        assert_eq!(tr.steps().len(), 1);
        assert_eq!(ContainerState::of(tr.doc()), ContainerState::NoContainer);
    }

    #[test]
    fn test_most_populated_container_wins() {
        let doc = Document::from_nodes(vec![container(&[7]), leaf("a")]);
        let mut tr = Transaction::new(&doc);
        tr.insert(2, container(&[1, 2, 3])).unwrap();
        TransactionGuard::enforce(&mut tr).unwrap();

        let containers = walk::find_containers(tr.doc());
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].index, 0);
        assert_eq!(containers[0].node.child_count(), 3);
        assert_eq!(tr.doc().text(), "a");
    }

    #[test]
    fn test_first_container_wins_tie() {
        let doc = Document::from_nodes(vec![leaf("a"), container(&[4]), leaf("b"), container(&[5])]);
        let mut tr = Transaction::new(&Document::from_text("a\nb"));
        tr.insert(1, container(&[4])).unwrap();
        tr.insert(3, container(&[5])).unwrap();
        assert_eq!(tr.doc().children(), doc.children());

        TransactionGuard::enforce(&mut tr).unwrap();
        let pages: Vec<_> = tr
            .doc()
            .override_entries()
            .map(|e| e.page_number())
            .collect();
        assert_eq!(pages, vec![PageSelector::Page(4)]);
        assert_eq!(tr.doc().text(), "a\nb");
    }

    #[test]
    fn test_misplaced_single_container_moves_to_front() {
        let doc = Document::from_nodes(vec![container(&[1]), leaf("a")]);
        let mut tr = Transaction::new(&doc);
        tr.insert(0, Block::paragraph("typed before")).unwrap();
        TransactionGuard::enforce(&mut tr).unwrap();

        assert!(tr.doc().first_child().unwrap().is_container());
        assert_eq!(tr.doc().text(), "typed before\na");
    }

    #[test]
    fn test_normalize_loaded_document() {
        let doc = Document::from_nodes(vec![leaf("a"), container(&[1, 2, 3])]);
        let repair = TransactionGuard::normalize(&doc).unwrap().unwrap();
        assert_eq!(ContainerState::of(repair.doc()), ContainerState::SingleCanonicalContainer);
        assert_eq!(repair.doc().override_entries().count(), 3);
        assert_eq!(repair.doc().text(), "a");

        assert!(TransactionGuard::normalize(&Document::from_text("a")).unwrap().is_none());
        assert!(TransactionGuard::normalize(repair.doc()).unwrap().is_none());
    }

    #[test]
    fn test_repair_is_undone_with_the_edit() {
        let doc = Document::from_nodes(vec![container(&[1]), leaf("a")]);
        let mut tr = Transaction::new(&doc);
        tr.delete(0).unwrap();
        TransactionGuard::enforce(&mut tr).unwrap();

        let (mut after, _, inverses) = tr.into_parts();
        for inverse in inverses.into_iter().rev() {
            after.apply_step(inverse).unwrap();
        }
        assert_eq!(after.children(), doc.children());
    }
}
