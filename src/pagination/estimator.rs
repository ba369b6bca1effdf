//! Page-count estimation from layout readings
//!
//! The estimator never lays the document out itself. It takes one reading of
//! the current layout and adjusts the previous page count by the number of
//! pages the content over- or undershoots by.

use crate::pagination::PageGeometry;

/// Distance from the band edges to the page boundaries that absorbs
/// sub-pixel layout noise
pub const TOLERANCE_PX: f32 = 10.0;

/// Upper bound on any estimate
pub const MAX_PAGE_COUNT: usize = 10_000;

/// What the layout host could tell about the current render
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutReading {
    /// No page markers rendered yet
    Unrendered { scroll_height: f32 },
    /// Markers rendered; `gap` is the content bottom minus the bottom of the
    /// last rendered break
    Rendered { gap: f32 },
    /// Markers exist but the last break or last content element could not be
    /// measured
    RenderedUnmeasured,
}

/// Estimate the page count.
///
/// `current` is the number of page markers already rendered and
/// `header_height`/`footer_height` the shared (page 0) region heights.
/// The result is always within `1..=MAX_PAGE_COUNT`. A non-finite reading
/// is not trusted: an unrendered one estimates a single page and a rendered
/// one keeps `current`.
pub fn estimate(
    geometry: &PageGeometry,
    reading: LayoutReading,
    current: usize,
    header_height: f32,
    footer_height: f32,
) -> usize {
    let usable = geometry.usable_height(header_height, footer_height).max(1.0);

    let count = match reading {
        LayoutReading::Unrendered { scroll_height } if !scroll_height.is_finite() => {
            log::debug!("ignoring non-finite scroll height {}", scroll_height);
            1
        }
        LayoutReading::Unrendered { scroll_height } => {
            let pages = (scroll_height / usable).ceil();
            if pages <= 0.0 {
                1
            } else {
                pages.min(MAX_PAGE_COUNT as f32) as usize
            }
        }
        LayoutReading::RenderedUnmeasured => 1,
        LayoutReading::Rendered { gap } if !gap.is_finite() => {
            log::debug!("ignoring non-finite content gap {}", gap);
            current
        }
        LayoutReading::Rendered { gap } => {
            let band_top = -TOLERANCE_PX;
            let band_bottom = -(geometry.page_height - TOLERANCE_PX);
            if gap > 0.0 {
                let add = (gap / usable).ceil().min(MAX_PAGE_COUNT as f32) as usize;
                current.saturating_add(add)
            } else if gap > band_bottom && gap <= band_top {
                current
            } else if gap <= band_bottom {
                let remove = (gap / geometry.page_stride().max(1.0)).floor();
                (current as f32 + remove).max(0.0) as usize
            } else {
                current
            }
        }
    };

    count.clamp(1, MAX_PAGE_COUNT)
}
