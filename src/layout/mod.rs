//! Layout hosts: the measurement seam and a headless flow layout

mod engine;
pub mod font;
mod line_break;
mod probe;

pub use engine::{BreakBand, FlowLayout};
pub use font::FontMetrics;
pub use line_break::{BlockLayout, LineBreaker, LineLayout, INDENT_WIDTH};
pub use probe::{LayoutHost, LayoutProbe, LayoutSnapshot};
