//! Decorations: the non-persisted page overlay

use crate::document::{Block, RegionKind};
use serde::Serialize;

/// Document position every page decoration is anchored at
pub const OVERLAY_ANCHOR: usize = 0;

/// A rendered header or footer region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDecoration {
    pub kind: RegionKind,
    /// Page number passed to click handlers
    pub page_number: u32,
    /// Whether a page-specific override supplied the content
    pub from_override: bool,
    pub left: Vec<Block>,
    pub right: Vec<Block>,
}

impl RegionDecoration {
    /// Height-record key this region is measured under
    pub fn height_key(&self) -> u32 {
        if self.from_override {
            self.page_number
        } else {
            0
        }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            RegionKind::Header => "rm-page-header",
            RegionKind::Footer => "rm-page-footer",
        }
    }

    /// Text of both sides, one line per block
    pub fn plain_text(&self) -> (String, String) {
        let join = |blocks: &[Block]| {
            blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        (join(&self.left), join(&self.right))
    }
}

/// Zero-height spacer whose top margin reserves a page's body area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlaceholder {
    /// Size variable that supplies the margin once measured
    pub var_name: String,
    /// Margin used while the variable is unset
    pub fallback_px: f32,
}

impl ContentPlaceholder {
    /// `margin-top` value as written into the overlay
    pub fn margin_top(&self) -> String {
        format!("var({}, {}px)", self.var_name, self.fallback_px)
    }
}

/// Spacer between two pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapStrip {
    pub height: f32,
    pub border_size: f32,
    pub border_color: String,
    pub background: String,
}

impl GapStrip {
    /// Height including the top and bottom border
    pub fn outer_height(&self) -> f32 {
        self.height + 2.0 * self.border_size
    }
}

/// The marker closing page `page_number`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreak {
    pub page_number: u32,
    pub placeholder: ContentPlaceholder,
    pub footer: RegionDecoration,
    /// `None` on the last page
    pub gap: Option<GapStrip>,
    /// Header of the following page; `None` on the last page
    pub next_header: Option<RegionDecoration>,
}

impl PageBreak {
    pub fn is_last(&self) -> bool {
        self.gap.is_none()
    }
}

/// One overlay element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration<'a> {
    FirstPageHeader(&'a RegionDecoration),
    PageBreak(&'a PageBreak),
}

/// The full overlay: first-page header followed by the page breaks in
/// ascending page order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationSet {
    anchor: usize,
    first_header: RegionDecoration,
    breaks: Vec<PageBreak>,
}

impl DecorationSet {
    pub fn new(first_header: RegionDecoration, breaks: Vec<PageBreak>) -> Self {
        Self {
            anchor: OVERLAY_ANCHOR,
            first_header,
            breaks,
        }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Number of page markers
    pub fn page_count(&self) -> usize {
        self.breaks.len()
    }

    pub fn first_header(&self) -> &RegionDecoration {
        &self.first_header
    }

    pub fn breaks(&self) -> &[PageBreak] {
        &self.breaks
    }

    /// Overlay elements in render order
    pub fn iter(&self) -> impl Iterator<Item = Decoration<'_>> + '_ {
        std::iter::once(Decoration::FirstPageHeader(&self.first_header))
            .chain(self.breaks.iter().map(Decoration::PageBreak))
    }

    /// Every header and footer region in render order
    pub fn regions(&self) -> impl Iterator<Item = &RegionDecoration> + '_ {
        std::iter::once(&self.first_header).chain(
            self.breaks
                .iter()
                .flat_map(|b| std::iter::once(&b.footer).chain(b.next_header.as_ref())),
        )
    }

    /// The region of `kind` reporting `page_number`
    pub fn region(&self, kind: RegionKind, page_number: u32) -> Option<&RegionDecoration> {
        self.regions()
            .find(|r| r.kind == kind && r.page_number == page_number)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
