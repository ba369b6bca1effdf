//! Per-session pagination state
//!
//! One `PaginationState` is owned by each editing session. It holds the
//! options the commands mutate, the last measurements, and the overlay built
//! from them, and decides on every transaction whether the overlay has to be
//! rebuilt.

use crate::document::{Document, RegionKind};
use crate::editing::Transaction;
use crate::layout::LayoutProbe;
use crate::pagination::click::{ClickEvent, ClickHandlers};
use crate::pagination::{
    estimate, DecorationBuilder, FrameScheduler, HeightProbe, HeightRecord, OverrideSet,
    PageGeometry, PaginationOptions,
};
use crate::render::{hard_break_widgets, DecorationSet, HardBreakWidget, StyleVars};
use std::rc::Rc;

/// Inputs the current overlay was built from
#[derive(Debug, Clone, PartialEq)]
struct BuildInputs {
    page_count: usize,
    geometry: PageGeometry,
    overrides: OverrideSet,
}

/// Outcome of the post-layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Rendered marker count disagrees with the estimate; a recompute was
    /// requested for the next frame
    Deferred,
    /// Heights were measured and size variables written
    Measured { vars_changed: bool },
}

#[derive(Debug)]
pub struct PaginationState {
    options: PaginationOptions,
    heights: HeightRecord,
    decorations: Rc<DecorationSet>,
    built: Option<BuildInputs>,
    hard_breaks: Rc<Vec<HardBreakWidget>>,
    style_vars: StyleVars,
    page_count: usize,
    scheduler: FrameScheduler,
    click_handlers: ClickHandlers,
}

impl PaginationState {
    /// Fresh state; the overlay starts without page breaks so the first
    /// layout pass reports the unpaginated content height
    pub fn new(options: PaginationOptions, document: &Document) -> Self {
        let heights = HeightRecord::new();
        let overrides = OverrideSet::resolve(&options, document);
        let decorations =
            DecorationBuilder::new(&options.geometry, &heights, &overrides).build_unpaged();
        Self {
            style_vars: StyleVars::from_geometry(&options.geometry),
            options,
            heights,
            decorations: Rc::new(decorations),
            built: None,
            hard_breaks: Rc::new(hard_break_widgets(document)),
            page_count: 0,
            scheduler: FrameScheduler::new(),
            click_handlers: ClickHandlers::new(),
        }
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    /// Options for direct mutation by commands; picked up by the next apply
    pub fn options_mut(&mut self) -> &mut PaginationOptions {
        &mut self.options
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.options.geometry
    }

    pub fn heights(&self) -> &HeightRecord {
        &self.heights
    }

    pub fn decorations(&self) -> &Rc<DecorationSet> {
        &self.decorations
    }

    pub fn hard_breaks(&self) -> &Rc<Vec<HardBreakWidget>> {
        &self.hard_breaks
    }

    pub fn style_vars(&self) -> &StyleVars {
        &self.style_vars
    }

    /// Page count from the last apply
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    pub fn click_handlers_mut(&mut self) -> &mut ClickHandlers {
        &mut self.click_handlers
    }

    /// Page count for the current layout
    pub fn estimate(&self, layout: &dyn LayoutProbe) -> usize {
        estimate(
            &self.options.geometry,
            layout.reading(),
            layout.rendered_page_count(),
            self.heights.header(0),
            self.heights.footer(0),
        )
    }

    /// Fold a committed transaction in.
    ///
    /// Estimates against the layout as it was before the transaction reflows
    /// and rebuilds the overlay only when the page count, geometry or
    /// override content changed. Returns whether it rebuilt.
    pub fn apply(&mut self, tr: &Transaction, layout: &dyn LayoutProbe) -> bool {
        let page_count = self.estimate(layout);
        self.page_count = page_count;

        if tr.doc_changed() {
            self.hard_breaks = Rc::new(hard_break_widgets(tr.doc()));
        }

        let inputs = BuildInputs {
            page_count,
            geometry: self.options.geometry.clone(),
            overrides: OverrideSet::resolve(&self.options, tr.doc()),
        };
        if self.built.as_ref() == Some(&inputs) {
            log::trace!("overlay unchanged at {} pages", page_count);
            return false;
        }

        log::debug!(
            "rebuilding overlay: {} -> {} pages",
            self.decorations.page_count(),
            page_count
        );
        let decorations =
            DecorationBuilder::new(&inputs.geometry, &self.heights, &inputs.overrides).build(page_count);
        self.decorations = Rc::new(decorations);
        self.built = Some(inputs);
        true
    }

    /// Post-layout pass.
    ///
    /// When the rendered marker count disagrees with a fresh estimate the
    /// correction is deferred to the next frame. Otherwise header/footer
    /// heights are remeasured and the size variables rewritten.
    pub fn view_update(&mut self, layout: &dyn LayoutProbe, document: &Document) -> ViewUpdate {
        let page_count = self.estimate(layout);
        if layout.rendered_page_count() != page_count {
            log::debug!(
                "{} pages rendered, {} needed; deferring to next frame",
                layout.rendered_page_count(),
                page_count
            );
            self.scheduler.request();
            return ViewUpdate::Deferred;
        }

        let overrides = OverrideSet::resolve(&self.options, document);
        let heights = HeightProbe::measure(layout, &overrides, page_count);
        let mut vars = StyleVars::from_geometry(&self.options.geometry);
        HeightProbe::write_content_vars(&mut vars, &self.options.geometry, &heights, page_count);
        vars.set_min_height(HeightProbe::min_height(layout));

        let vars_changed = !vars.same_vars(&self.style_vars);
        self.heights = heights;
        self.style_vars = vars;
        ViewUpdate::Measured { vars_changed }
    }

    /// Forward a click on the region of `kind` reporting `page_number`
    pub fn activate_region(&self, kind: RegionKind, page_number: u32, event: &ClickEvent) -> bool {
        match self.decorations.region(kind, page_number) {
            Some(region) => self.click_handlers.activate(region, event),
            None => false,
        }
    }
}
