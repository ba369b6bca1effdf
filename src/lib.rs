//! Page-Weave: page-based layout on top of a continuous-flow document editor
//!
//! This crate provides:
//! - Page-count estimation from measured layout, with a tolerance band
//! - A decoration overlay of page breaks, headers, footers and page gaps
//! - Per-page header/footer overrides stored inside the document itself
//! - A transaction guard that keeps the override container at position 0
//! - A headless flow layout so sessions can settle without a browser

pub mod document;
pub mod editing;
pub mod error;
pub mod layout;
pub mod pagination;
pub mod render;
pub mod undo;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmEditor;

// Re-export primary types
pub use document::{Block, BlockKind, Document, ListMarker, Node, OverrideEntry, PageSelector, RegionKind};
pub use editing::{Dispatch, NodePath, Step, Transaction};
pub use error::{PaginationError, Result};
pub use layout::{FlowLayout, FontMetrics, LayoutHost, LayoutProbe, LayoutSnapshot};
pub use pagination::{
    ClickEvent, HeaderFooterContent, OverrideContentParams, PageGeometry, PageSize,
    PaginationOptions, PaginationState, ViewUpdate,
};
pub use render::{DecorationSet, HardBreakWidget, PageBreak, RegionDecoration, StyleVars};
pub use undo::UndoManager;

use pagination::{set_override_content, OverrideSet, TransactionGuard};
use std::rc::Rc;

/// Editor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Reflow passes allowed per commit while style variables keep changing
const MAX_VIEW_PASSES: usize = 3;

/// Undo history depth
const HISTORY_DEPTH: usize = 100;

/// One editing session: the document, its history, the pagination state and
/// the layout host that renders it
pub struct Editor<L: LayoutHost = FlowLayout> {
    document: Document,
    undo_manager: UndoManager,
    pagination: PaginationState,
    layout: L,
}

impl Editor<FlowLayout> {
    /// Create an editor over `document`, laid out headlessly
    pub fn new(document: Document, options: PaginationOptions) -> Self {
        Self::with_layout(document, options, FlowLayout::new())
    }

    /// Create an editor with initial text content
    pub fn with_text(text: &str, options: PaginationOptions) -> Self {
        Self::new(Document::from_text(text), options)
    }
}

impl<L: LayoutHost> Editor<L> {
    /// Create an editor driving the given layout host.
    ///
    /// The first layout runs without page breaks; the initial commit then
    /// paginates from the measured content height and moves a misplaced
    /// override container to the front, outside the undo history.
    pub fn with_layout(document: Document, options: PaginationOptions, layout: L) -> Self {
        let pagination = PaginationState::new(options, &document);
        let mut editor = Self {
            document,
            undo_manager: UndoManager::new(HISTORY_DEPTH),
            pagination,
            layout,
        };
        editor.reflow();
        let mut initial = editor.metadata_transaction("initial layout");
        match TransactionGuard::normalize(initial.doc()) {
            Ok(Some(repair)) => initial.append(repair),
            Ok(None) => {}
            Err(err) => log::warn!("loaded document keeps a misplaced override container: {}", err),
        }
        editor.dispatch(initial);
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn options(&self) -> &PaginationOptions {
        self.pagination.options()
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Layout host for external hosts reporting new measurements; follow
    /// with [`Editor::view_update`]
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo_manager
    }

    /// Number of pages in the current overlay
    pub fn page_count(&self) -> usize {
        self.pagination.decorations().page_count()
    }

    pub fn decorations(&self) -> &Rc<DecorationSet> {
        self.pagination.decorations()
    }

    pub fn style_vars(&self) -> &StyleVars {
        self.pagination.style_vars()
    }

    /// Hard-break widgets of the current document
    pub fn hard_breaks(&self) -> &Rc<Vec<HardBreakWidget>> {
        self.pagination.hard_breaks()
    }

    /// Content shown in the `kind` region of `page`, overrides applied
    pub fn region_content(&self, kind: RegionKind, page: u32) -> HeaderFooterContent {
        OverrideSet::resolve(self.options(), &self.document)
            .content_for(kind, page)
            .content
            .clone()
    }

    /// Start a transaction against the current document
    pub fn transaction(&self) -> Transaction {
        Transaction::new(&self.document)
    }

    /// Commit a transaction.
    ///
    /// The override container guard runs first, then history, pagination and
    /// layout see the final document.
    pub fn dispatch(&mut self, mut tr: Transaction) {
        if let Err(err) = TransactionGuard::enforce(&mut tr) {
            log::warn!("override container repair failed: {}", err);
        }

        self.undo_manager.record(&tr);
        self.pagination.apply(&tr, &self.layout);
        let (document, _, _) = tr.into_parts();
        self.document = document;

        self.reflow();
        self.settle_view();
    }

    /// Run the post-layout pass once against the current layout
    pub fn view_update(&mut self) -> ViewUpdate {
        self.pagination.view_update(&self.layout, &self.document)
    }

    /// Run a pending page refresh, if one was requested.
    ///
    /// Returns whether a frame ran.
    pub fn tick(&mut self) -> bool {
        if !self.pagination.scheduler_mut().take() {
            return false;
        }
        let tr = self.metadata_transaction("page refresh").mark_page_refresh();
        self.dispatch(tr);
        true
    }

    /// Run pending frames until none is requested or `max_frames` ran.
    ///
    /// Returns the number of frames run.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.tick() {
            frames += 1;
        }
        log::debug!("settled at {} pages after {} frames", self.page_count(), frames);
        frames
    }

    /// Whether a page refresh is waiting for the next frame
    pub fn has_pending_frame(&self) -> bool {
        self.pagination.scheduler().is_pending()
    }

    /// Insert a block at root `index`
    pub fn insert_block(&mut self, index: usize, block: Block) -> Result<()> {
        let mut tr = self.transaction().with_description("insert block");
        tr.insert(index, block)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Replace the block at root `index`
    pub fn replace_block(&mut self, index: usize, block: Block) -> Result<()> {
        let mut tr = self.transaction().with_description("replace block");
        tr.replace(index, block)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Delete the root nodes in `range`
    pub fn delete_range(&mut self, range: std::ops::Range<usize>) -> Result<()> {
        let mut tr = self.transaction().with_description("delete");
        tr.delete_range(range)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Replace the whole document content with `nodes`
    pub fn set_content(&mut self, nodes: Vec<Node>) -> Result<()> {
        let mut tr = self.transaction().with_description("set content");
        tr.delete_range(0..self.document.len())?;
        tr.insert_all(0, nodes)?;
        self.dispatch(tr);
        Ok(())
    }

    /// Store header/footer content for one page or for every page
    pub fn set_override_content(
        &mut self,
        position: RegionKind,
        page_number: PageSelector,
        left: &str,
        right: &str,
    ) -> Result<bool> {
        let params = OverrideContentParams::new(position, page_number, left, right);
        let tr = self.transaction().with_description("set override content");
        let dispatch: &mut dyn Dispatch = self;
        set_override_content(tr, &params, Some(dispatch))
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> bool {
        match self.undo_manager.undo(&self.document) {
            Some(tr) => {
                self.dispatch(tr);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> bool {
        match self.undo_manager.redo(&self.document) {
            Some(tr) => {
                self.dispatch(tr);
                true
            }
            None => false,
        }
    }

    pub fn update_page_size(&mut self, size: PageSize) -> bool {
        self.pagination.options_mut().geometry.apply_size(&size);
        self.refresh_options("update page size")
    }

    pub fn update_page_height(&mut self, page_height: f32) -> bool {
        self.pagination.options_mut().geometry.page_height = page_height;
        self.refresh_options("update page height")
    }

    pub fn update_page_width(&mut self, page_width: f32) -> bool {
        self.pagination.options_mut().geometry.page_width = page_width;
        self.refresh_options("update page width")
    }

    pub fn update_page_gap(&mut self, page_gap: f32) -> bool {
        self.pagination.options_mut().geometry.page_gap = page_gap;
        self.refresh_options("update page gap")
    }

    pub fn update_margins(&mut self, top: f32, bottom: f32, left: f32, right: f32) -> bool {
        let margins = &mut self.pagination.options_mut().geometry.margins;
        margins.top = top;
        margins.bottom = bottom;
        margins.left = left;
        margins.right = right;
        self.refresh_options("update margins")
    }

    pub fn update_content_margins(&mut self, top: f32, bottom: f32) -> bool {
        let content_margins = &mut self.pagination.options_mut().geometry.content_margins;
        content_margins.top = top;
        content_margins.bottom = bottom;
        self.refresh_options("update content margins")
    }

    pub fn update_page_break_background(&mut self, color: &str) -> bool {
        self.pagination.options_mut().geometry.page_break_background = color.to_string();
        self.refresh_options("update page break background")
    }

    /// Set the default header, or the options-level header of one page
    pub fn update_header_content(&mut self, left: &str, right: &str, page: Option<u32>) -> Result<bool> {
        self.update_region_content(RegionKind::Header, left, right, page)
    }

    /// Set the default footer, or the options-level footer of one page
    pub fn update_footer_content(&mut self, left: &str, right: &str, page: Option<u32>) -> Result<bool> {
        self.update_region_content(RegionKind::Footer, left, right, page)
    }

    fn update_region_content(
        &mut self,
        kind: RegionKind,
        left: &str,
        right: &str,
        page: Option<u32>,
    ) -> Result<bool> {
        let content = HeaderFooterContent::from_fragments(left, right)?;
        let options = self.pagination.options_mut();
        match (kind, page) {
            (RegionKind::Header, None) => options.header = content,
            (RegionKind::Footer, None) => options.footer = content,
            (RegionKind::Header, Some(page)) => {
                options.custom_header.insert(page, content);
            }
            (RegionKind::Footer, Some(page)) => {
                options.custom_footer.insert(page, content);
            }
        }
        Ok(self.refresh_options("update region content"))
    }

    /// Register the callback for clicks on header regions
    pub fn on_header_click(&mut self, handler: impl Fn(u32, &ClickEvent) + 'static) {
        self.pagination
            .click_handlers_mut()
            .set(RegionKind::Header, Some(Rc::new(handler)));
    }

    /// Register the callback for clicks on footer regions
    pub fn on_footer_click(&mut self, handler: impl Fn(u32, &ClickEvent) + 'static) {
        self.pagination
            .click_handlers_mut()
            .set(RegionKind::Footer, Some(Rc::new(handler)));
    }

    /// Forward a click on a rendered region to its handler
    pub fn activate_region(&self, kind: RegionKind, page_number: u32, event: &ClickEvent) -> bool {
        self.pagination.activate_region(kind, page_number, event)
    }

    fn metadata_transaction(&self, description: &str) -> Transaction {
        self.transaction()
            .without_history()
            .with_description(description)
    }

    fn refresh_options(&mut self, description: &str) -> bool {
        let tr = self.metadata_transaction(description);
        self.dispatch(tr);
        true
    }

    fn reflow(&mut self) {
        self.layout.reflow(
            &self.document,
            self.pagination.decorations(),
            self.pagination.style_vars(),
            self.pagination.geometry(),
        );
    }

    fn settle_view(&mut self) {
        for _ in 0..MAX_VIEW_PASSES {
            match self.view_update() {
                ViewUpdate::Measured { vars_changed: true } => self.reflow(),
                _ => break,
            }
        }
    }
}

impl<L: LayoutHost> Dispatch for Editor<L> {
    fn dispatch(&mut self, tr: Transaction) {
        Editor::dispatch(self, tr)
    }
}
