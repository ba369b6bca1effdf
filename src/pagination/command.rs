//! Override content upsert

use crate::document::fragment::parse_fragment;
use crate::document::{walk, Node, OverrideEntry, PageSelector, RegionKind};
use crate::editing::{Dispatch, NodePath, Step, Transaction};
use crate::error::Result;
use crate::pagination::TransactionGuard;

/// Arguments of [`set_override_content`]
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideContentParams {
    pub position: RegionKind,
    pub page_number: PageSelector,
    /// Content fragment for the left slot
    pub left: String,
    /// Content fragment for the right slot
    pub right: String,
}

impl OverrideContentParams {
    pub fn new(
        position: RegionKind,
        page_number: PageSelector,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            position,
            page_number,
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Write a header/footer override into the document's override container.
///
/// Any existing entry for the same position and page is replaced. Returns
/// `Ok(false)` without touching `tr` when there is no dispatcher, and an error
/// when either fragment is malformed; in that case `tr` is left unchanged.
pub fn set_override_content(
    mut tr: Transaction,
    params: &OverrideContentParams,
    dispatch: Option<&mut dyn Dispatch>,
) -> Result<bool> {
    let Some(dispatch) = dispatch else {
        return Ok(false);
    };

    let entry = OverrideEntry::new(
        params.position,
        params.page_number,
        parse_fragment(&params.left)?,
        parse_fragment(&params.right)?,
    );

    if let Some(repair) = TransactionGuard::normalize(tr.doc())? {
        tr.append(repair);
    }
    if !tr.doc().first_child().is_some_and(Node::is_container) {
        tr.insert(0, Node::container())?;
    }

    let stale: Vec<usize> = tr
        .doc()
        .override_container()
        .map(|container| {
            walk::find_entries(container, params.position, params.page_number)
                .iter()
                .map(|m| m.index)
                .collect()
        })
        .unwrap_or_default();
    for index in stale.into_iter().rev() {
        tr.step(Step::Delete {
            path: NodePath::child(0, index),
        })?;
    }

    tr.insert_child(0, 0, entry)?;
    dispatch.dispatch(tr);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Document};

    #[derive(Default)]
    struct Collect(Vec<Transaction>);

    impl Dispatch for Collect {
        fn dispatch(&mut self, tr: Transaction) {
            self.0.push(tr);
        }
    }

    fn upsert(doc: &Document, params: &OverrideContentParams) -> Document {
        let mut sink = Collect::default();
        assert!(set_override_content(Transaction::new(doc), params, Some(&mut sink)).unwrap());
        let tr = sink.0.pop().unwrap();
        tr.doc().clone()
    }

    #[test]
    fn test_without_dispatch() {
        let doc = Document::new();
        let params = OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(2), "A", "B");
        assert!(!set_override_content(Transaction::new(&doc), &params, None).unwrap());
    }

    #[test]
    fn test_creates_container() {
        let doc = upsert(
            &Document::from_text("body"),
            &OverrideContentParams::new(RegionKind::Header, PageSelector::AllPages, "", "<p>Title</p>"),
        );
        assert!(doc.first_child().unwrap().is_container());
        let entry = doc.override_entries().next().unwrap();
        assert_eq!(entry.page_number(), PageSelector::AllPages);
        assert_eq!(entry.left().blocks, vec![Block::empty()]);
        assert_eq!(entry.right().blocks, vec![Block::paragraph("Title")]);
        assert_eq!(doc.text(), "body");
    }

    #[test]
    fn test_upsert_replaces() {
        let doc = upsert(
            &Document::new(),
            &OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(2), "A", "B"),
        );
        let doc = upsert(&doc, &OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(2), "C", "D"));

        let entries: Vec<_> = doc.override_entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].left().plain_text(), "C");
        assert_eq!(entries[0].right().plain_text(), "D");
    }

    #[test]
    fn test_removes_every_duplicate() {
        let dup = |text: &str| {
            Node::Entry(OverrideEntry::new(
                RegionKind::Footer,
                PageSelector::Page(1),
                vec![Block::paragraph(text)],
                vec![Block::empty()],
            ))
        };
        let other = Node::Entry(OverrideEntry::new(
            RegionKind::Header,
            PageSelector::Page(1),
            vec![Block::paragraph("keep")],
            vec![Block::empty()],
        ));
        let doc = Document::from_nodes(vec![
            Node::Container {
                children: vec![dup("x"), other, dup("y")],
            },
            Node::Leaf(Block::empty()),
        ]);
        let doc = upsert(&doc, &OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(1), "z", ""));

        let entries: Vec<_> = doc.override_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].left().plain_text(), "z");
        assert_eq!(entries[1].left().plain_text(), "keep");
    }

    #[test]
    fn test_malformed_fragment_is_rejected() {
        let doc = Document::new();
        let mut sink = Collect::default();
        let params = OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(1), "<p>open", "");
        let err = set_override_content(Transaction::new(&doc), &params, Some(&mut sink)).unwrap_err();
        assert!(err.is_schema_violation());
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_misplaced_container_keeps_write() {
        let footer = |page: u32| {
            Node::Entry(OverrideEntry::new(
                RegionKind::Footer,
                PageSelector::Page(page),
                vec![Block::empty()],
                vec![Block::paragraph(page.to_string())],
            ))
        };
        let doc = Document::from_nodes(vec![
            Node::Leaf(Block::paragraph("body")),
            Node::Container {
                children: vec![footer(1), footer(2), footer(3)],
            },
        ]);
        let doc = upsert(&doc, &OverrideContentParams::new(RegionKind::Footer, PageSelector::Page(5), "", "NEW"));

        assert_eq!(walk::find_containers(&doc).len(), 1);
        let entries: Vec<_> = doc.override_entries().collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].right().plain_text(), "NEW");
        assert_eq!(doc.text(), "body");
    }

    #[test]
    fn test_idempotent() {
        let params = OverrideContentParams::new(RegionKind::Header, PageSelector::Page(3), "<h2>Ch</h2>", "x");
        let once = upsert(&Document::new(), &params);
        let twice = upsert(&once, &params);
        assert_eq!(once.children(), twice.children());
    }
}
