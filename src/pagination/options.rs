//! Session configuration: geometry plus default header/footer content

use crate::document::fragment::{parse_fragment, write_fragment};
use crate::document::{Block, OverrideEntry};
use crate::error::Result;
use crate::pagination::PageGeometry;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Left and right content of a header or footer
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFooterContent {
    pub left: Vec<Block>,
    pub right: Vec<Block>,
}

impl Default for HeaderFooterContent {
    fn default() -> Self {
        Self {
            left: vec![Block::empty()],
            right: vec![Block::empty()],
        }
    }
}

impl HeaderFooterContent {
    /// Parse both sides from content fragments
    pub fn from_fragments(left: &str, right: &str) -> Result<Self> {
        Ok(Self {
            left: parse_fragment(left)?,
            right: parse_fragment(right)?,
        })
    }

    pub fn from_entry(entry: &OverrideEntry) -> Self {
        Self {
            left: entry.left().blocks.clone(),
            right: entry.right().blocks.clone(),
        }
    }

    /// Both sides written back out as fragments
    pub fn to_fragments(&self) -> (String, String) {
        (write_fragment(&self.left), write_fragment(&self.right))
    }
}

/// Per-session pagination options.
///
/// Owned by the editing session and mutated directly by the update
/// commands; every change is picked up by the next rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationOptions {
    pub geometry: PageGeometry,
    /// Header used where no override applies
    pub header: HeaderFooterContent,
    /// Footer used where no override applies
    pub footer: HeaderFooterContent,
    /// Page-specific headers set through options rather than the document
    pub custom_header: BTreeMap<u32, HeaderFooterContent>,
    /// Page-specific footers set through options rather than the document
    pub custom_footer: BTreeMap<u32, HeaderFooterContent>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            header: HeaderFooterContent::default(),
            footer: HeaderFooterContent {
                left: vec![Block::empty()],
                right: vec![Block::paragraph("{page}")],
            },
            custom_header: BTreeMap::new(),
            custom_footer: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSlots {
    left: String,
    right: String,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOptions {
    #[serde(flatten)]
    geometry: PageGeometry,
    header_left: String,
    header_right: String,
    footer_left: String,
    footer_right: String,
    custom_header: BTreeMap<u32, RawSlots>,
    custom_footer: BTreeMap<u32, RawSlots>,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            header_left: String::new(),
            header_right: String::new(),
            footer_left: String::new(),
            footer_right: "{page}".to_string(),
            custom_header: BTreeMap::new(),
            custom_footer: BTreeMap::new(),
        }
    }
}

fn parse_custom(raw: BTreeMap<u32, RawSlots>) -> Result<BTreeMap<u32, HeaderFooterContent>> {
    raw.into_iter()
        .filter(|(page, _)| *page >= 1)
        .map(|(page, slots)| Ok((page, HeaderFooterContent::from_fragments(&slots.left, &slots.right)?)))
        .collect()
}

impl PaginationOptions {
    /// Load options from camelCase JSON; every field is optional.
    ///
    /// Header/footer fields are content fragments and are parsed here, so a
    /// malformed fragment fails the whole load.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOptions = serde_json::from_str(json)?;
        Ok(Self {
            geometry: raw.geometry,
            header: HeaderFooterContent::from_fragments(&raw.header_left, &raw.header_right)?,
            footer: HeaderFooterContent::from_fragments(&raw.footer_left, &raw.footer_right)?,
            custom_header: parse_custom(raw.custom_header)?,
            custom_footer: parse_custom(raw.custom_footer)?,
        })
    }
}
