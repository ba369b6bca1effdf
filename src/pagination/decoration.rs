//! Builds the page overlay

use crate::document::{Block, RegionKind};
use crate::pagination::{HeightRecord, HeightProbe, OverrideSet, PageGeometry};
use crate::render::style::{page_content_var, PAGE_CONTENT_FIRST, PAGE_CONTENT_GENERAL};
use crate::render::{ContentPlaceholder, DecorationSet, GapStrip, PageBreak, RegionDecoration};

/// Placeholder in region text replaced by the region's page number
pub const PAGE_NUMBER_TOKEN: &str = "{page}";

/// Builds a [`DecorationSet`] from geometry, heights, overrides and a page
/// count
pub struct DecorationBuilder<'a> {
    geometry: &'a PageGeometry,
    heights: &'a HeightRecord,
    overrides: &'a OverrideSet,
}

impl<'a> DecorationBuilder<'a> {
    pub fn new(geometry: &'a PageGeometry, heights: &'a HeightRecord, overrides: &'a OverrideSet) -> Self {
        Self {
            geometry,
            heights,
            overrides,
        }
    }

    pub fn build(&self, page_count: usize) -> DecorationSet {
        let page_count = page_count.max(1) as u32;
        let first_header = self.region(RegionKind::Header, 1);
        let breaks = (1..=page_count)
            .map(|page| self.page_break(page, page == page_count))
            .collect();
        DecorationSet::new(first_header, breaks)
    }

    /// Overlay with the first-page header only, laid out before any page
    /// count is known
    pub fn build_unpaged(&self) -> DecorationSet {
        DecorationSet::new(self.region(RegionKind::Header, 1), Vec::new())
    }

    fn region(&self, kind: RegionKind, page_number: u32) -> RegionDecoration {
        let resolved = self.overrides.content_for(kind, page_number);
        RegionDecoration {
            kind,
            page_number,
            from_override: resolved.from_override,
            left: substitute_page(&resolved.content.left, page_number),
            right: substitute_page(&resolved.content.right, page_number),
        }
    }

    fn page_break(&self, page: u32, last: bool) -> PageBreak {
        let footer = self.region(RegionKind::Footer, page);
        let (gap, next_header) = if last {
            (None, None)
        } else {
            let gap = GapStrip {
                height: self.geometry.page_gap,
                border_size: self.geometry.gap_border_size,
                border_color: self.geometry.gap_border_color.clone(),
                background: self.geometry.page_break_background.clone(),
            };
            (Some(gap), Some(self.region(RegionKind::Header, page + 1)))
        };

        PageBreak {
            page_number: page,
            placeholder: self.placeholder(page),
            footer,
            gap,
            next_header,
        }
    }

    /// Spacer for the body of `page`.
    ///
    /// A page whose break carries override content gets its own variable;
    /// all other pages share the first/general variables.
    fn placeholder(&self, page: u32) -> ContentPlaceholder {
        let has_override = self.overrides.has_override(RegionKind::Header, page)
            || self.overrides.has_override(RegionKind::Footer, page)
            || self.overrides.has_override(RegionKind::Header, page + 1);

        let fallback_px = HeightProbe::content_height(self.geometry, self.heights, page);
        let var_name = if has_override {
            page_content_var(page)
        } else if page == 1 {
            PAGE_CONTENT_FIRST.to_string()
        } else {
            PAGE_CONTENT_GENERAL.to_string()
        };
        ContentPlaceholder {
            var_name,
            fallback_px,
        }
    }
}

fn substitute_page(blocks: &[Block], page_number: u32) -> Vec<Block> {
    blocks
        .iter()
        .map(|block| {
            if block.text.contains(PAGE_NUMBER_TOKEN) {
                Block {
                    kind: block.kind.clone(),
                    text: block
                        .text
                        .replace(PAGE_NUMBER_TOKEN, &page_number.to_string()),
                }
            } else {
                block.clone()
            }
        })
        .collect()
}
