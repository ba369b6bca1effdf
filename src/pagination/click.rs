//! Click bridge from header/footer regions to host callbacks

use crate::document::RegionKind;
use crate::render::RegionDecoration;
use crate::Point;
use std::fmt;
use std::rc::Rc;

/// Pointer event forwarded to click handlers as received
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickEvent {
    pub position: Point,
    pub button: u16,
}

/// Callback receiving the region's page number and the event
pub type RegionClickHandler = Rc<dyn Fn(u32, &ClickEvent)>;

/// Optional header and footer click handlers
#[derive(Clone, Default)]
pub struct ClickHandlers {
    header: Option<RegionClickHandler>,
    footer: Option<RegionClickHandler>,
}

impl fmt::Debug for ClickHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHandlers")
            .field("header", &self.header.is_some())
            .field("footer", &self.footer.is_some())
            .finish()
    }
}

impl ClickHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: RegionKind, handler: Option<RegionClickHandler>) {
        match kind {
            RegionKind::Header => self.header = handler,
            RegionKind::Footer => self.footer = handler,
        }
    }

    pub fn get(&self, kind: RegionKind) -> Option<&RegionClickHandler> {
        match kind {
            RegionKind::Header => self.header.as_ref(),
            RegionKind::Footer => self.footer.as_ref(),
        }
    }

    /// Invoke the handler for `region`; false when none is registered
    pub fn activate(&self, region: &RegionDecoration, event: &ClickEvent) -> bool {
        match self.get(region.kind) {
            Some(handler) => {
                handler(region.page_number, event);
                true
            }
            None => false,
        }
    }
}
