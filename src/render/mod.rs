//! Render output: page overlay, size variables and inline widgets

mod display;
pub mod style;
mod widgets;

pub use display::{
    ContentPlaceholder, Decoration, DecorationSet, GapStrip, PageBreak, RegionDecoration,
    OVERLAY_ANCHOR,
};
pub use style::StyleVars;
pub use widgets::{hard_break_widgets, hard_breaks_json, HardBreakWidget, HARD_BREAK_CLASS};
