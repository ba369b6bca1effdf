//! Flat buffer protocol for handing the page overlay to JS without copies
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x5057_4F56 = "PWOV" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     version_lo (document version)
//! [3]     version_hi (document version)
//! [4]     page_count
//! [5]     text_buffer_len
//! [6..]   first-page header region, then per break:
//!
//! Per-break:
//!   page_number
//!   flags: bit0=last page
//!   footer region
//!   next-header region (only when not the last page)
//!
//! Per-region: [kind, page_number, flags, left_offset, left_len, right_offset, right_len]
//!   kind: 0=header, 1=footer
//!   flags: bit0=from_override
//!   left/right: byte ranges of plain text in text_data (UTF-8)
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-break: [placeholder_fallback_px, gap_outer_height]
//! ```

use crate::document::RegionKind;
use crate::render::{DecorationSet, RegionDecoration};

/// Magic number for format validation: "PWOV" (Page-Weave OVerlay)
pub const MAGIC: u32 = 0x5057_4F56;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 6;

/// Number of u32 values per region
pub const U32_PER_REGION: usize = 7;

/// Number of f32 values per page break
pub const F32_PER_BREAK: usize = 2;

pub const REGION_HEADER: u32 = 0;
pub const REGION_FOOTER: u32 = 1;

pub const FLAG_FROM_OVERRIDE: u32 = 0b01;
pub const FLAG_LAST_PAGE: u32 = 0b01;

/// Overlay buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct OverlayBuffer {
    /// Integer data (counts, flags, text ranges)
    pub u32_data: Vec<u32>,
    /// Float data (placeholder and gap sizes)
    pub f32_data: Vec<f32>,
    /// UTF-8 region text
    pub text_data: Vec<u8>,
}

impl OverlayBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(256),
            f32_data: Vec::with_capacity(64),
            text_data: Vec::with_capacity(1024),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
    }

    /// Encode `decorations`, replacing previous content.
    ///
    /// JS holds pointers into these buffers, so re-read the pointers after
    /// every call.
    pub fn write(&mut self, version: u64, decorations: &DecorationSet) {
        self.clear();
        self.u32_data.push(MAGIC);
        self.u32_data.push(SCHEMA_VERSION);
        self.u32_data.push((version & 0xFFFF_FFFF) as u32);
        self.u32_data.push((version >> 32) as u32);
        self.u32_data.push(decorations.page_count() as u32);
        self.u32_data.push(0); // text_buffer_len, synced below

        self.write_region(decorations.first_header());
        for page_break in decorations.breaks() {
            self.u32_data.push(page_break.page_number);
            self.u32_data.push(if page_break.is_last() { FLAG_LAST_PAGE } else { 0 });
            self.f32_data.push(page_break.placeholder.fallback_px);
            self.f32_data
                .push(page_break.gap.as_ref().map_or(0.0, |gap| gap.outer_height()));

            self.write_region(&page_break.footer);
            if let Some(header) = &page_break.next_header {
                self.write_region(header);
            }
        }

        self.u32_data[5] = self.text_data.len() as u32;
    }

    fn write_region(&mut self, region: &RegionDecoration) {
        let kind = match region.kind {
            RegionKind::Header => REGION_HEADER,
            RegionKind::Footer => REGION_FOOTER,
        };
        let flags = if region.from_override { FLAG_FROM_OVERRIDE } else { 0 };
        let (left, right) = region.plain_text();

        self.u32_data.push(kind);
        self.u32_data.push(region.page_number);
        self.u32_data.push(flags);
        self.push_text(&left);
        self.push_text(&right);
    }

    fn push_text(&mut self, text: &str) {
        self.u32_data.push(self.text_data.len() as u32);
        self.u32_data.push(text.len() as u32);
        self.text_data.extend_from_slice(text.as_bytes());
    }

    // wasm32 linear memory uses u32 offsets

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::render::{ContentPlaceholder, GapStrip, PageBreak};

    fn region(kind: RegionKind, page_number: u32, right: &str) -> RegionDecoration {
        RegionDecoration {
            kind,
            page_number,
            from_override: false,
            left: vec![Block::empty()],
            right: vec![Block::paragraph(right)],
        }
    }

    fn page_break(page_number: u32, last: bool) -> PageBreak {
        PageBreak {
            page_number,
            placeholder: ContentPlaceholder {
                var_name: "--rm-page-content-general".to_string(),
                fallback_px: 770.0,
            },
            footer: region(RegionKind::Footer, page_number, &page_number.to_string()),
            gap: (!last).then(|| GapStrip {
                height: 20.0,
                border_size: 1.0,
                border_color: "#e5e5e5".to_string(),
                background: "#f7f7f7".to_string(),
            }),
            next_header: (!last).then(|| region(RegionKind::Header, page_number + 1, "")),
        }
    }

    #[test]
    fn test_overlay_buffer_header() {
        let set = DecorationSet::new(
            region(RegionKind::Header, 1, ""),
            vec![page_break(1, false), page_break(2, true)],
        );
        let mut buf = OverlayBuffer::new();
        buf.write(42, &set);

        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.u32_data[1], SCHEMA_VERSION);
        assert_eq!(buf.u32_data[2], 42);
        assert_eq!(buf.u32_data[4], 2);
        assert_eq!(buf.u32_data[5] as usize, buf.text_data.len());
        assert_eq!(buf.text_data, b"12");
        assert_eq!(buf.f32_data, vec![770.0, 22.0, 770.0, 0.0]);
    }

    #[test]
    fn test_overlay_buffer_regions() {
        let set = DecorationSet::new(region(RegionKind::Header, 1, ""), vec![page_break(1, true)]);
        let mut buf = OverlayBuffer::new();
        buf.write(1, &set);

        // header region, break fields, footer region
        assert_eq!(buf.u32_data.len(), HEADER_SIZE + 2 * U32_PER_REGION + 2);
        let break_at = HEADER_SIZE + U32_PER_REGION;
        assert_eq!(buf.u32_data[break_at], 1);
        assert_eq!(buf.u32_data[break_at + 1], FLAG_LAST_PAGE);

        let footer = break_at + 2;
        assert_eq!(buf.u32_data[footer], REGION_FOOTER);
        let (offset, len) = (buf.u32_data[footer + 5] as usize, buf.u32_data[footer + 6] as usize);
        assert_eq!(&buf.text_data[offset..offset + len], b"1");
    }
}
