//! WASM bindings for the paginated editor
//!
//! The browser lays the document out; it reports measurements through
//! `reportMeasurements` and runs `tick` on the next animation frame whenever
//! a refresh is pending.

pub mod flat_buffer;

use crate::error::PaginationError;
use crate::render::hard_breaks_json;
use crate::{
    ClickEvent, Document, Editor, LayoutSnapshot, PageSelector, PageSize, PaginationOptions, Point,
    RegionKind, ViewUpdate,
};
use flat_buffer::OverlayBuffer;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: PaginationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn click_handler(callback: js_sys::Function) -> impl Fn(u32, &ClickEvent) + 'static {
    move |page: u32, event: &ClickEvent| {
        let js_event = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&js_event, &"x".into(), &event.position.x.into());
        let _ = js_sys::Reflect::set(&js_event, &"y".into(), &event.position.y.into());
        let _ = js_sys::Reflect::set(&js_event, &"button".into(), &event.button.into());
        if let Err(err) = callback.call2(&JsValue::NULL, &page.into(), &js_event) {
            log::warn!("region click handler threw: {:?}", err);
        }
    }
}

/// WASM-exposed editor wrapper
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor<LayoutSnapshot>,
    overlay: OverlayBuffer,
}

impl WasmEditor {
    fn build(document: Document, options_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let options = match options_json {
            Some(json) => PaginationOptions::from_json(&json).map_err(to_js)?,
            None => PaginationOptions::default(),
        };
        Ok(Self {
            editor: Editor::with_layout(document, options, LayoutSnapshot::default()),
            overlay: OverlayBuffer::new(),
        })
    }
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor over an empty document; `options_json` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<WasmEditor, JsValue> {
        Self::build(Document::new(), options_json)
    }

    /// Create an editor over a persisted document
    #[wasm_bindgen(js_name = withDocument)]
    pub fn with_document(document_json: &str, options_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let document = Document::from_json(document_json).map_err(to_js)?;
        Self::build(document, options_json)
    }

    /// Feed the measurements of the latest browser layout.
    ///
    /// Returns `"deferred"` when a refresh was requested for the next frame,
    /// `"changed"` when the size variables changed and `"stable"` otherwise.
    #[wasm_bindgen(js_name = reportMeasurements)]
    pub fn report_measurements(&mut self, snapshot_json: &str) -> Result<String, JsValue> {
        let snapshot = LayoutSnapshot::from_json(snapshot_json).map_err(to_js)?;
        *self.editor.layout_mut() = snapshot;
        let outcome = match self.editor.view_update() {
            ViewUpdate::Deferred => "deferred",
            ViewUpdate::Measured { vars_changed: true } => "changed",
            ViewUpdate::Measured { vars_changed: false } => "stable",
        };
        Ok(outcome.to_string())
    }

    /// Run a pending page refresh; call from `requestAnimationFrame`
    pub fn tick(&mut self) -> bool {
        self.editor.tick()
    }

    #[wasm_bindgen(js_name = hasPendingFrame)]
    pub fn has_pending_frame(&self) -> bool {
        self.editor.has_pending_frame()
    }

    /// Store header/footer content; `page_number` below 1 targets all pages
    #[wasm_bindgen(js_name = setOverrideContent)]
    pub fn set_override_content(
        &mut self,
        position: &str,
        page_number: i32,
        left: &str,
        right: &str,
    ) -> Result<bool, JsValue> {
        let position: RegionKind = position.parse().map_err(to_js)?;
        self.editor
            .set_override_content(position, PageSelector::from(page_number as i64), left, right)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = updatePageSize)]
    pub fn update_page_size(&mut self, name: &str) -> bool {
        match PageSize::named(name) {
            Some(size) => self.editor.update_page_size(size),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = updatePageHeight)]
    pub fn update_page_height(&mut self, page_height: f32) -> bool {
        self.editor.update_page_height(page_height)
    }

    #[wasm_bindgen(js_name = updatePageWidth)]
    pub fn update_page_width(&mut self, page_width: f32) -> bool {
        self.editor.update_page_width(page_width)
    }

    #[wasm_bindgen(js_name = updatePageGap)]
    pub fn update_page_gap(&mut self, page_gap: f32) -> bool {
        self.editor.update_page_gap(page_gap)
    }

    #[wasm_bindgen(js_name = updateMargins)]
    pub fn update_margins(&mut self, top: f32, bottom: f32, left: f32, right: f32) -> bool {
        self.editor.update_margins(top, bottom, left, right)
    }

    #[wasm_bindgen(js_name = updateContentMargins)]
    pub fn update_content_margins(&mut self, top: f32, bottom: f32) -> bool {
        self.editor.update_content_margins(top, bottom)
    }

    #[wasm_bindgen(js_name = updatePageBreakBackground)]
    pub fn update_page_break_background(&mut self, color: &str) -> bool {
        self.editor.update_page_break_background(color)
    }

    #[wasm_bindgen(js_name = updateHeaderContent)]
    pub fn update_header_content(&mut self, left: &str, right: &str, page: Option<u32>) -> Result<bool, JsValue> {
        self.editor.update_header_content(left, right, page).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateFooterContent)]
    pub fn update_footer_content(&mut self, left: &str, right: &str, page: Option<u32>) -> Result<bool, JsValue> {
        self.editor.update_footer_content(left, right, page).map_err(to_js)
    }

    /// Undo last operation
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo last undone operation
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    #[wasm_bindgen(js_name = onHeaderClick)]
    pub fn on_header_click(&mut self, callback: js_sys::Function) {
        self.editor.on_header_click(click_handler(callback));
    }

    #[wasm_bindgen(js_name = onFooterClick)]
    pub fn on_footer_click(&mut self, callback: js_sys::Function) {
        self.editor.on_footer_click(click_handler(callback));
    }

    /// Forward a DOM click on a rendered header/footer region
    #[wasm_bindgen(js_name = activateRegion)]
    pub fn activate_region(&self, position: &str, page_number: u32, x: f32, y: f32, button: u16) -> bool {
        let Ok(kind) = position.parse::<RegionKind>() else {
            return false;
        };
        let event = ClickEvent {
            position: Point::new(x, y),
            button,
        };
        self.editor.activate_region(kind, page_number, &event)
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.editor.page_count()
    }

    /// Get full document text
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.editor.document().text()
    }

    #[wasm_bindgen(js_name = getDocumentJson)]
    pub fn get_document_json(&self) -> Result<String, JsValue> {
        self.editor.document().to_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = getDecorationsJson)]
    pub fn get_decorations_json(&self) -> Result<String, JsValue> {
        self.editor.decorations().to_json().map_err(to_js)
    }

    /// Hard-break widgets and the class to render them with
    #[wasm_bindgen(js_name = getHardBreaksJson)]
    pub fn get_hard_breaks_json(&self) -> Result<String, JsValue> {
        hard_breaks_json(self.editor.hard_breaks()).map_err(to_js)
    }

    /// Left and right fragments shown in a region of `page_number`, as
    /// `{"left": ..., "right": ...}`
    #[wasm_bindgen(js_name = getRegionContentJson)]
    pub fn get_region_content_json(&self, position: &str, page_number: u32) -> Result<String, JsValue> {
        let kind: RegionKind = position.parse().map_err(to_js)?;
        let (left, right) = self.editor.region_content(kind, page_number).to_fragments();
        Ok(serde_json::json!({ "left": left, "right": right }).to_string())
    }

    /// Size variables as CSS declarations for the editor root
    #[wasm_bindgen(js_name = getStyleCss)]
    pub fn get_style_css(&self) -> String {
        self.editor.style_vars().to_css()
    }

    /// Encode the overlay into the flat buffers; re-read pointers afterwards
    #[wasm_bindgen(js_name = updateOverlayBuffer)]
    pub fn update_overlay_buffer(&mut self) {
        let version = self.editor.document().version();
        self.overlay.write(version, self.editor.decorations());
    }

    #[wasm_bindgen(js_name = overlayU32Ptr)]
    pub fn overlay_u32_ptr(&self) -> u32 {
        self.overlay.u32_ptr()
    }

    #[wasm_bindgen(js_name = overlayU32Len)]
    pub fn overlay_u32_len(&self) -> u32 {
        self.overlay.u32_len()
    }

    #[wasm_bindgen(js_name = overlayF32Ptr)]
    pub fn overlay_f32_ptr(&self) -> u32 {
        self.overlay.f32_ptr()
    }

    #[wasm_bindgen(js_name = overlayF32Len)]
    pub fn overlay_f32_len(&self) -> u32 {
        self.overlay.f32_len()
    }

    #[wasm_bindgen(js_name = overlayTextPtr)]
    pub fn overlay_text_ptr(&self) -> u32 {
        self.overlay.text_ptr()
    }

    #[wasm_bindgen(js_name = overlayTextLen)]
    pub fn overlay_text_len(&self) -> u32 {
        self.overlay.text_len()
    }
}
