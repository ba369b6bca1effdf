//! Headless flow layout
//!
//! Places body blocks the way a browser flows them around the page overlay:
//! the first-page header sits in normal flow at the top, and every page break
//! is a full-width float whose position is fixed by its content placeholder.
//! Body lines that would overlap a break are pushed below it.

use crate::document::{Block, BlockKind, Document, RegionKind};
use crate::layout::font::FontMetrics;
use crate::layout::line_break::{BlockLayout, LineBreaker};
use crate::layout::probe::{LayoutHost, LayoutProbe};
use crate::pagination::PageGeometry;
use crate::render::{DecorationSet, RegionDecoration, StyleVars};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

/// Vertical extent of a rendered page break
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakBand {
    pub page_number: u32,
    pub top: f32,
    pub bottom: f32,
}

impl BreakBand {
    fn overlaps(&self, y: f32, height: f32) -> bool {
        y < self.bottom && y + height > self.top
    }
}

/// A block layout together with the input it was computed from
#[derive(Debug, Clone)]
struct CachedBlock {
    block: Block,
    width_bits: u32,
    layout: BlockLayout,
}

impl CachedBlock {
    fn matches(&self, block: &Block, width: f32) -> bool {
        self.width_bits == width.to_bits() && self.block == *block
    }
}

type BlockCache = FxHashMap<u64, CachedBlock>;

/// Layout engine used when no browser is attached
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    line_breaker: LineBreaker,
    /// Block layouts from the last reflow, keyed by content hash
    block_cache: BlockCache,
    bands: Vec<BreakBand>,
    region_heights: FxHashMap<(RegionKind, u32), f32>,
    content_bottom: Option<f32>,
    scroll_height: f32,
    /// Version of the document this layout corresponds to
    layout_version: u64,
}

impl FlowLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: FontMetrics) -> Self {
        Self {
            line_breaker: LineBreaker::new(metrics),
            ..Self::default()
        }
    }

    pub fn bands(&self) -> &[BreakBand] {
        &self.bands
    }

    pub fn layout_version(&self) -> u64 {
        self.layout_version
    }

    /// Layout a block, reusing the previous pass when nothing changed
    fn layout_cached(&self, fresh: &mut BlockCache, block: &Block, width: f32) -> BlockLayout {
        let key = block_key(block, width);
        if let Some(cached) = fresh.get(&key).filter(|c| c.matches(block, width)) {
            return cached.layout.clone();
        }
        let layout = match self.block_cache.get(&key).filter(|c| c.matches(block, width)) {
            Some(cached) => cached.layout.clone(),
            None => self.line_breaker.layout_block(block, width),
        };
        fresh.insert(
            key,
            CachedBlock {
                block: block.clone(),
                width_bits: width.to_bits(),
                layout: layout.clone(),
            },
        );
        layout
    }

    /// Content height of a region: the taller side, clamped to the page limit
    fn measure_region(
        &self,
        fresh: &mut BlockCache,
        region: &RegionDecoration,
        geometry: &PageGeometry,
    ) -> f32 {
        let side_width = geometry.content_width() / 2.0;
        let mut side_height = |blocks: &[Block]| -> f32 {
            blocks
                .iter()
                .filter(|b| !b.is_empty())
                .map(|b| self.layout_cached(fresh, b, side_width).lines_height())
                .sum()
        };
        let height = side_height(&region.left).max(side_height(&region.right));
        let limit = match region.kind {
            RegionKind::Header => geometry.max_header_height(),
            RegionKind::Footer => geometry.max_footer_height(),
        };
        height.min(limit)
    }

    /// Next y at or below `y` where a line of `height` clears every band
    fn clear_bands(&self, next_band: &mut usize, mut y: f32, height: f32) -> f32 {
        while let Some(band) = self.bands.get(*next_band) {
            if band.bottom <= y {
                *next_band += 1;
            } else if band.overlaps(y, height) {
                y = band.bottom;
                *next_band += 1;
            } else {
                break;
            }
        }
        y
    }
}

fn block_key(block: &Block, width: f32) -> u64 {
    let mut hasher = FxHasher::default();
    block.kind.tag().hash(&mut hasher);
    if let BlockKind::ListItem { indent_level, .. } = &block.kind {
        indent_level.hash(&mut hasher);
    }
    block.text.hash(&mut hasher);
    width.to_bits().hash(&mut hasher);
    hasher.finish()
}

impl LayoutProbe for FlowLayout {
    fn rendered_page_count(&self) -> usize {
        self.bands.len()
    }

    fn scroll_height(&self) -> f32 {
        self.scroll_height
    }

    fn content_bottom(&self) -> Option<f32> {
        self.content_bottom
    }

    fn last_break_bottom(&self) -> Option<f32> {
        self.bands.last().map(|band| band.bottom)
    }

    fn region_height(&self, kind: RegionKind, key: u32) -> Option<f32> {
        self.region_heights.get(&(kind, key)).copied()
    }
}

impl LayoutHost for FlowLayout {
    fn reflow(
        &mut self,
        document: &Document,
        decorations: &DecorationSet,
        vars: &StyleVars,
        geometry: &PageGeometry,
    ) {
        let mut fresh = BlockCache::default();

        // Phase 1: measure header/footer regions
        let mut region_heights = FxHashMap::default();
        for region in decorations.regions() {
            let height = self.measure_region(&mut fresh, region, geometry);
            region_heights.insert((region.kind, region.height_key()), height);
        }
        let height_of = |region: &RegionDecoration| {
            region_heights
                .get(&(region.kind, region.height_key()))
                .copied()
                .unwrap_or(0.0)
        };

        // Phase 2: stack the page-break floats
        let mut bands = Vec::with_capacity(decorations.page_count());
        let mut float_y = 0.0;
        for page_break in decorations.breaks() {
            let spacer = vars
                .px(&page_break.placeholder.var_name)
                .unwrap_or(page_break.placeholder.fallback_px);
            let top = float_y + spacer;
            let mut height = geometry.footer_band(height_of(&page_break.footer));
            if let Some(gap) = &page_break.gap {
                height += gap.outer_height();
            }
            if let Some(header) = &page_break.next_header {
                height += geometry.header_band(height_of(header));
            }
            bands.push(BreakBand {
                page_number: page_break.page_number,
                top,
                bottom: top + height,
            });
            float_y = top + height;
        }
        self.bands = bands;

        // Phase 3: flow body lines around the floats
        let width = geometry.content_width();
        let mut y = geometry.header_band(height_of(decorations.first_header()));
        let mut content_bottom = y;
        let mut next_band = 0;
        for block in document.blocks() {
            let layout = self.layout_cached(&mut fresh, block, width);
            for line in &layout.lines {
                y = self.clear_bands(&mut next_band, y, line.height);
                y += line.height;
            }
            content_bottom = y;
            y += layout.spacing_after;
        }

        self.content_bottom = Some(content_bottom);
        self.scroll_height = y.max(float_y);
        self.region_heights = region_heights;
        self.block_cache = fresh;
        self.layout_version = document.version();
    }
}
