//! Measurement seam between pagination and whoever lays the document out

use crate::document::{Document, RegionKind};
use crate::pagination::{LayoutReading, PageGeometry};
use crate::render::{DecorationSet, StyleVars};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Read-only view of a completed layout pass
pub trait LayoutProbe {
    /// Number of page markers currently rendered
    fn rendered_page_count(&self) -> usize;

    /// Full height of the rendered content
    fn scroll_height(&self) -> f32;

    /// Bottom edge of the last content element
    fn content_bottom(&self) -> Option<f32>;

    /// Bottom edge of the last rendered page break
    fn last_break_bottom(&self) -> Option<f32>;

    /// Content height of a rendered header/footer region.
    ///
    /// `key` is the page number for page-specific regions and 0 for regions
    /// showing the shared content.
    fn region_height(&self, kind: RegionKind, key: u32) -> Option<f32>;

    /// Reading handed to the page-count estimator
    fn reading(&self) -> LayoutReading {
        if self.rendered_page_count() == 0 {
            return LayoutReading::Unrendered {
                scroll_height: self.scroll_height(),
            };
        }
        match (self.content_bottom(), self.last_break_bottom()) {
            (Some(content), Some(last_break)) => LayoutReading::Rendered {
                gap: content - last_break,
            },
            _ => LayoutReading::RenderedUnmeasured,
        }
    }
}

/// A layout engine the editor drives after every commit
pub trait LayoutHost: LayoutProbe {
    fn reflow(
        &mut self,
        document: &Document,
        decorations: &DecorationSet,
        vars: &StyleVars,
        geometry: &PageGeometry,
    );
}

/// Measurements reported by an external renderer such as a browser
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub rendered_page_count: usize,
    pub scroll_height: f32,
    pub content_bottom: Option<f32>,
    pub last_break_bottom: Option<f32>,
    pub header_heights: FxHashMap<u32, f32>,
    pub footer_heights: FxHashMap<u32, f32>,
}

impl LayoutSnapshot {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl LayoutProbe for LayoutSnapshot {
    fn rendered_page_count(&self) -> usize {
        self.rendered_page_count
    }

    fn scroll_height(&self) -> f32 {
        self.scroll_height
    }

    fn content_bottom(&self) -> Option<f32> {
        self.content_bottom
    }

    fn last_break_bottom(&self) -> Option<f32> {
        self.last_break_bottom
    }

    fn region_height(&self, kind: RegionKind, key: u32) -> Option<f32> {
        match kind {
            RegionKind::Header => self.header_heights.get(&key).copied(),
            RegionKind::Footer => self.footer_heights.get(&key).copied(),
        }
    }
}

/// The snapshot is replaced by the host after it renders; reflowing it is a
/// no-op.
impl LayoutHost for LayoutSnapshot {
    fn reflow(&mut self, _: &Document, _: &DecorationSet, _: &StyleVars, _: &PageGeometry) {}
}
