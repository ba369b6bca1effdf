//! Header/footer height measurement and per-page size variables

use crate::document::RegionKind;
use crate::layout::LayoutProbe;
use crate::pagination::{OverrideSet, PageGeometry};
use crate::render::style::{
    page_content_var, MAX_CONTENT_CHILD_HEIGHT, PAGE_CONTENT_FIRST, PAGE_CONTENT_GENERAL,
};
use crate::render::StyleVars;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Extra room added below the last break when sizing the editor
const MIN_HEIGHT_SLACK: f32 = 2.0;

/// Clearance kept between the tallest allowed child and the page body
const CHILD_HEIGHT_SLACK: f32 = 10.0;

/// Measured region heights per page; key 0 is the shared measurement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightRecord {
    header: FxHashMap<u32, f32>,
    footer: FxHashMap<u32, f32>,
}

impl HeightRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: RegionKind) -> &FxHashMap<u32, f32> {
        match kind {
            RegionKind::Header => &self.header,
            RegionKind::Footer => &self.footer,
        }
    }

    pub fn set(&mut self, kind: RegionKind, page: u32, height: f32) {
        match kind {
            RegionKind::Header => self.header.insert(page, height),
            RegionKind::Footer => self.footer.insert(page, height),
        };
    }

    pub fn contains(&self, kind: RegionKind, page: u32) -> bool {
        self.map(kind).contains_key(&page)
    }

    /// Height for `page`, falling back to the shared measurement, then 0
    pub fn get(&self, kind: RegionKind, page: u32) -> f32 {
        let map = self.map(kind);
        map.get(&page)
            .or_else(|| map.get(&0))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn header(&self, page: u32) -> f32 {
        self.get(RegionKind::Header, page)
    }

    pub fn footer(&self, page: u32) -> f32 {
        self.get(RegionKind::Footer, page)
    }

    /// Page numbers with their own measurement, page 0 excluded
    pub fn measured_pages(&self) -> BTreeSet<u32> {
        self.header
            .keys()
            .chain(self.footer.keys())
            .copied()
            .filter(|page| *page != 0)
            .collect()
    }
}

/// Measures rendered header/footer regions and derives size variables
pub struct HeightProbe;

impl HeightProbe {
    /// Measure page 0 and every override page up to `page_count`.
    ///
    /// A region the layout cannot report counts as 0.
    pub fn measure(layout: &dyn LayoutProbe, overrides: &OverrideSet, page_count: usize) -> HeightRecord {
        let mut record = HeightRecord::new();
        for kind in [RegionKind::Header, RegionKind::Footer] {
            record.set(kind, 0, layout.region_height(kind, 0).unwrap_or(0.0));
            for page in overrides.override_pages(kind) {
                if page as usize <= page_count {
                    record.set(kind, page, layout.region_height(kind, page).unwrap_or(0.0));
                }
            }
        }
        record
    }

    /// Body height of `page` under `record`; page 1 also spans the header band
    pub fn content_height(geometry: &PageGeometry, record: &HeightRecord, page: u32) -> f32 {
        let header = record.header(page);
        let body = geometry.usable_height(header, record.footer(page));
        if page == 1 {
            body + geometry.header_band(header)
        } else {
            body
        }
    }

    /// Write the per-page content variables for the current page count.
    ///
    /// Page 1 and every separately measured page get a variable, plus the
    /// first page without its own measurement, which stands in for all
    /// remaining pages.
    pub fn write_content_vars(
        vars: &mut StyleVars,
        geometry: &PageGeometry,
        record: &HeightRecord,
        page_count: usize,
    ) {
        let last_page = page_count.max(1) as u32;
        let mut pages: BTreeSet<u32> = record
            .measured_pages()
            .into_iter()
            .filter(|page| *page <= last_page)
            .collect();
        pages.insert(1);
        let general = (1..=last_page).find(|page| !pages.contains(page));
        if let Some(general) = general {
            pages.insert(general);
        }

        let mut min_content: Option<f32> = None;
        for page in pages {
            let height = Self::content_height(geometry, record, page);
            if page == 1 {
                vars.set_px(PAGE_CONTENT_FIRST, height);
            }
            if Some(page) == general {
                vars.set_px(PAGE_CONTENT_GENERAL, height);
            } else {
                vars.set_px(page_content_var(page), height);
            }
            if min_content.map_or(true, |min| height < min) {
                min_content = Some(height);
            }
        }

        if let Some(min_content) = min_content.filter(|h| *h > 0.0) {
            vars.set_px(MAX_CONTENT_CHILD_HEIGHT, min_content - CHILD_HEIGHT_SLACK);
        }
    }

    /// Editor min-height: bottom of the last rendered break plus slack
    pub fn min_height(layout: &dyn LayoutProbe) -> Option<f32> {
        layout
            .last_break_bottom()
            .map(|bottom| bottom + MIN_HEIGHT_SLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::layout::LayoutSnapshot;
    use crate::pagination::{HeaderFooterContent, PaginationOptions};

    #[test]
    fn test_record_fallback() {
        let mut record = HeightRecord::new();
        assert_eq!(record.header(3), 0.0);
        record.set(RegionKind::Header, 0, 20.0);
        record.set(RegionKind::Header, 3, 45.0);
        assert_eq!(record.header(3), 45.0);
        assert_eq!(record.header(2), 20.0);
        assert_eq!(record.footer(2), 0.0);
        assert_eq!(record.measured_pages().into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_measure_limits_to_page_count() {
        let mut options = PaginationOptions::default();
        for page in [2, 5] {
            options
                .custom_footer
                .insert(page, HeaderFooterContent::from_fragments("x", "y").unwrap());
        }
        let overrides = OverrideSet::resolve(&options, &Document::new());
        let mut snapshot = LayoutSnapshot::default();
        snapshot.footer_heights.insert(0, 17.0);
        snapshot.footer_heights.insert(5, 40.0);

        let record = HeightProbe::measure(&snapshot, &overrides, 3);
        assert_eq!(record.footer(0), 17.0);
        // override page 2 exists but was not measurable
        assert!(record.contains(RegionKind::Footer, 2));
        assert_eq!(record.footer(2), 0.0);
        assert!(!record.contains(RegionKind::Footer, 5));
        assert_eq!(record.header(1), 0.0);
    }

    #[test]
    fn test_content_vars_defaults() {
        let geometry = PageGeometry::default();
        let mut vars = StyleVars::new();
        HeightProbe::write_content_vars(&mut vars, &geometry, &HeightRecord::new(), 3);
        assert_eq!(vars.px(PAGE_CONTENT_FIRST), Some(770.0));
        assert_eq!(vars.px(&page_content_var(1)), Some(770.0));
        assert_eq!(vars.px(PAGE_CONTENT_GENERAL), Some(740.0));
        assert_eq!(vars.px(&page_content_var(2)), None);
        assert_eq!(vars.px(MAX_CONTENT_CHILD_HEIGHT), Some(730.0));
    }

    #[test]
    fn test_content_vars_with_override_page() {
        let geometry = PageGeometry::default();
        let mut record = HeightRecord::new();
        record.set(RegionKind::Footer, 0, 20.0);
        record.set(RegionKind::Footer, 2, 60.0);
        let mut vars = StyleVars::new();
        HeightProbe::write_content_vars(&mut vars, &geometry, &record, 4);

        assert_eq!(vars.px(PAGE_CONTENT_FIRST), Some(750.0));
        assert_eq!(vars.px(&page_content_var(2)), Some(680.0));
        assert_eq!(vars.px(PAGE_CONTENT_GENERAL), Some(720.0));
        assert_eq!(vars.px(MAX_CONTENT_CHILD_HEIGHT), Some(670.0));
    }

    #[test]
    fn test_single_page_has_no_general() {
        let mut vars = StyleVars::new();
        HeightProbe::write_content_vars(&mut vars, &PageGeometry::default(), &HeightRecord::new(), 1);
        assert_eq!(vars.px(PAGE_CONTENT_FIRST), Some(770.0));
        assert_eq!(vars.px(PAGE_CONTENT_GENERAL), None);
    }

    #[test]
    fn test_min_height() {
        let snapshot = LayoutSnapshot {
            rendered_page_count: 1,
            last_break_bottom: Some(800.0),
            ..Default::default()
        };
        assert_eq!(HeightProbe::min_height(&snapshot), Some(802.0));
    }
}
