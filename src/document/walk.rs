//! Typed tree-walk helpers
//!
//! Both the transaction guard and the content command locate nodes through
//! these helpers. Matches carry the child index they were found at so that
//! callers can turn them into steps directly.

use crate::document::{Document, Node, PageSelector, RegionKind};
use smallvec::SmallVec;

/// A node found at `index` among its siblings
#[derive(Debug, Clone, Copy)]
pub struct NodeMatch<'a> {
    pub index: usize,
    pub node: &'a Node,
}

/// Matches in ascending index order
pub type Matches<'a> = SmallVec<[NodeMatch<'a>; 2]>;

/// Collect every sibling satisfying `predicate`
pub fn find_children<'a>(nodes: &'a [Node], predicate: impl Fn(&Node) -> bool) -> Matches<'a> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| predicate(node))
        .map(|(index, node)| NodeMatch { index, node })
        .collect()
}

/// Root-level override containers
pub fn find_containers(document: &Document) -> Matches<'_> {
    find_children(document.children(), Node::is_container)
}

/// Entries of `container` keyed by `(position, page_number)`
pub fn find_entries(
    container: &Node,
    position: RegionKind,
    page_number: PageSelector,
) -> Matches<'_> {
    find_children(container.children(), |node| {
        node.as_entry()
            .map(|entry| entry.matches(position, page_number))
            .unwrap_or(false)
    })
}

/// The match with the most children; the earliest one wins a tie
pub fn most_populated<'a, 'm>(matches: &'m [NodeMatch<'a>]) -> Option<&'m NodeMatch<'a>> {
    let mut best: Option<&'m NodeMatch<'a>> = None;
    for candidate in matches {
        match best {
            Some(current) if candidate.node.child_count() <= current.node.child_count() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, OverrideEntry};

    fn entry(position: RegionKind, page: PageSelector) -> Node {
        Node::Entry(OverrideEntry::new(
            position,
            page,
            vec![Block::empty()],
            vec![Block::empty()],
        ))
    }

    #[test]
    fn test_find_containers_reports_indices() {
        let doc = Document::from_nodes(vec![
            Node::Leaf(Block::paragraph("a")),
            Node::container(),
            Node::Leaf(Block::paragraph("b")),
            Node::container(),
        ]);
        let found = find_containers(&doc);
        let indices: Vec<_> = found.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_find_entries_by_key() {
        let container = Node::Container {
            children: vec![
                entry(RegionKind::Footer, PageSelector::Page(2)),
                entry(RegionKind::Header, PageSelector::Page(2)),
                entry(RegionKind::Footer, PageSelector::Page(2)),
            ],
        };
        let found = find_entries(&container, RegionKind::Footer, PageSelector::Page(2));
        let indices: Vec<_> = found.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_most_populated_prefers_first_on_tie() {
        let a = Node::Container {
            children: vec![entry(RegionKind::Header, PageSelector::AllPages)],
        };
        let b = Node::Container {
            children: vec![entry(RegionKind::Footer, PageSelector::AllPages)],
        };
        let nodes = vec![a, b];
        let found = find_children(&nodes, Node::is_container);
        assert_eq!(most_populated(&found).map(|m| m.index), Some(0));
        assert!(most_populated(&[]).is_none());
    }
}
