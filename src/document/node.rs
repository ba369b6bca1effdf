//! Tree nodes: the override container, its entries, and leaf blocks

use crate::document::Block;
use crate::error::PaginationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a header/footer region sits on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Header,
    Footer,
}

impl RegionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Header => "header",
            RegionKind::Footer => "footer",
        }
    }
}

impl FromStr for RegionKind {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(RegionKind::Header),
            "footer" => Ok(RegionKind::Footer),
            other => Err(PaginationError::schema(format!(
                "unknown region position `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pages an override applies to.
///
/// Persisted as a plain integer: `-1` for [`PageSelector::AllPages`], the page
/// number otherwise. Integers below 1 all decode to `AllPages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PageSelector {
    /// Applies to every page without a page-specific override
    AllPages,
    /// A single 1-based page
    Page(u32),
}

impl PageSelector {
    /// Persisted value of [`PageSelector::AllPages`]
    pub const ALL_PAGES_SENTINEL: i64 = -1;

    pub fn page(&self) -> Option<u32> {
        match self {
            PageSelector::AllPages => None,
            PageSelector::Page(n) => Some(*n),
        }
    }

    /// Key used in height records: 0 stands for the shared measurement
    pub fn height_key(&self) -> u32 {
        self.page().unwrap_or(0)
    }
}

impl From<i64> for PageSelector {
    fn from(value: i64) -> Self {
        if value >= 1 {
            PageSelector::Page(value.min(u32::MAX as i64) as u32)
        } else {
            PageSelector::AllPages
        }
    }
}

impl From<PageSelector> for i64 {
    fn from(value: PageSelector) -> Self {
        match value {
            PageSelector::AllPages => PageSelector::ALL_PAGES_SENTINEL,
            PageSelector::Page(n) => n as i64,
        }
    }
}

impl From<Option<u32>> for PageSelector {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) if n >= 1 => PageSelector::Page(n),
            _ => PageSelector::AllPages,
        }
    }
}

/// Left or right half of a header/footer region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSide {
    Left,
    Right,
}

impl SlotSide {
    /// Marker class attached to the slot when rendered
    pub fn class(&self) -> &'static str {
        match self {
            SlotSide::Left => "contentLeft",
            SlotSide::Right => "contentRight",
        }
    }
}

/// One content slot of an override entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSlot {
    pub side: SlotSide,
    pub blocks: Vec<Block>,
}

impl ContentSlot {
    pub fn new(side: SlotSide, blocks: Vec<Block>) -> Self {
        Self { side, blocks }
    }

    /// Concatenated text of every block, one line per block
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Key attributes of an override entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAttrs {
    pub position: RegionKind,
    pub page_number: PageSelector,
}

/// A per-page (or all-pages) header/footer override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub attrs: EntryAttrs,
    /// Always `[left, right]`
    pub slots: [ContentSlot; 2],
}

impl OverrideEntry {
    pub fn new(
        position: RegionKind,
        page_number: PageSelector,
        left: Vec<Block>,
        right: Vec<Block>,
    ) -> Self {
        Self {
            attrs: EntryAttrs {
                position,
                page_number,
            },
            slots: [
                ContentSlot::new(SlotSide::Left, left),
                ContentSlot::new(SlotSide::Right, right),
            ],
        }
    }

    pub fn position(&self) -> RegionKind {
        self.attrs.position
    }

    pub fn page_number(&self) -> PageSelector {
        self.attrs.page_number
    }

    pub fn left(&self) -> &ContentSlot {
        &self.slots[0]
    }

    pub fn right(&self) -> &ContentSlot {
        &self.slots[1]
    }

    pub fn matches(&self, position: RegionKind, page_number: PageSelector) -> bool {
        self.attrs.position == position && self.attrs.page_number == page_number
    }
}

/// A document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// The override store; only valid at root level and holds only entries
    Container {
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A header/footer override; only valid inside a container
    Entry(OverrideEntry),
    /// Ordinary content
    Leaf(Block),
}

impl Node {
    /// An empty override container
    pub fn container() -> Self {
        Node::Container {
            children: Vec::new(),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container { .. })
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container { children } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Container { children } => Some(children),
            _ => None,
        }
    }

    /// Number of direct children; leaves and entries have none
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn as_entry(&self) -> Option<&OverrideEntry> {
        match self {
            Node::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Block> {
        match self {
            Node::Leaf(block) => Some(block),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Container { .. } => "container",
            Node::Entry(_) => "entry",
            Node::Leaf(_) => "leaf",
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Leaf(block)
    }
}

impl From<OverrideEntry> for Node {
    fn from(entry: OverrideEntry) -> Self {
        Node::Entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_selector_sentinel() {
        assert_eq!(PageSelector::from(-1), PageSelector::AllPages);
        assert_eq!(PageSelector::from(0), PageSelector::AllPages);
        assert_eq!(PageSelector::from(3), PageSelector::Page(3));
        assert_eq!(i64::from(PageSelector::AllPages), -1);
        assert_eq!(PageSelector::from(None), PageSelector::AllPages);
        assert_eq!(PageSelector::AllPages.height_key(), 0);
        assert_eq!(PageSelector::Page(4).height_key(), 4);
    }

    #[test]
    fn test_entry_accessors() {
        let entry = OverrideEntry::new(
            RegionKind::Footer,
            PageSelector::Page(2),
            vec![Block::paragraph("A")],
            vec![Block::paragraph("B")],
        );
        assert_eq!(entry.left().side, SlotSide::Left);
        assert_eq!(entry.right().plain_text(), "B");
        assert!(entry.matches(RegionKind::Footer, PageSelector::Page(2)));
        assert!(!entry.matches(RegionKind::Header, PageSelector::Page(2)));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = OverrideEntry::new(
            RegionKind::Header,
            PageSelector::AllPages,
            vec![Block::empty()],
            vec![Block::empty()],
        );
        let json = serde_json::to_value(Node::Entry(entry)).unwrap();
        assert_eq!(json["type"], "entry");
        assert_eq!(json["attrs"]["position"], "header");
        assert_eq!(json["attrs"]["pageNumber"], -1);
        assert_eq!(json["slots"][1]["side"], "right");
    }
}
