//! Page geometry

use serde::{Deserialize, Serialize};

/// Share of the page height a header or footer region may take
pub const REGION_MAX_SHARE: f32 = 0.45;

/// Outer page margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 20.0,
            left: 50.0,
            right: 50.0,
        }
    }
}

/// Space between the header/footer regions and the body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentMargins {
    pub top: f32,
    pub bottom: f32,
}

impl Default for ContentMargins {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 10.0,
        }
    }
}

/// Page size and spacing parameters, in CSS pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_height: f32,
    pub page_width: f32,
    pub page_gap: f32,
    pub margins: Margins,
    pub content_margins: ContentMargins,
    pub gap_border_size: f32,
    pub gap_border_color: String,
    pub page_break_background: String,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_height: 800.0,
            page_width: 789.0,
            page_gap: 50.0,
            margins: Margins::default(),
            content_margins: ContentMargins::default(),
            gap_border_size: 1.0,
            gap_border_color: "#e5e5e5".to_string(),
            page_break_background: "#ffffff".to_string(),
        }
    }
}

impl PageGeometry {
    /// Height above the body: margin, content margin and header content
    pub fn header_band(&self, header_height: f32) -> f32 {
        self.margins.top + self.content_margins.top + header_height
    }

    /// Height below the body: content margin, margin and footer content
    pub fn footer_band(&self, footer_height: f32) -> f32 {
        self.content_margins.bottom + self.margins.bottom + footer_height
    }

    /// Body height of a page with the given header/footer content heights
    pub fn usable_height(&self, header_height: f32, footer_height: f32) -> f32 {
        self.page_height - self.header_band(header_height) - self.footer_band(footer_height)
    }

    /// Distance from one page top to the next
    pub fn page_stride(&self) -> f32 {
        self.page_height + self.page_gap
    }

    /// Width available to body text
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Largest header content height the page layout allows
    pub fn max_header_height(&self) -> f32 {
        (self.page_height * REGION_MAX_SHARE - self.margins.top - self.content_margins.top).max(0.0)
    }

    /// Largest footer content height the page layout allows
    pub fn max_footer_height(&self) -> f32 {
        (self.page_height * REGION_MAX_SHARE - self.content_margins.bottom - self.margins.bottom)
            .max(0.0)
    }

    /// Height of the strip between two pages
    pub fn gap_strip_height(&self) -> f32 {
        self.page_gap + 2.0 * self.gap_border_size
    }

    /// Apply a named page size
    pub fn apply_size(&mut self, size: &PageSize) {
        self.page_height = size.page_height;
        self.page_width = size.page_width;
        self.margins = Margins {
            top: size.margin_top,
            bottom: size.margin_bottom,
            left: size.margin_left,
            right: size.margin_right,
        };
    }
}

/// A page size preset with its margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSize {
    pub page_height: f32,
    pub page_width: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageSize {
    pub const A3: PageSize = PageSize::with_inch_margins(1587.0, 1123.0);
    pub const A4: PageSize = PageSize::with_inch_margins(1123.0, 794.0);
    pub const A5: PageSize = PageSize {
        page_height: 794.0,
        page_width: 559.0,
        margin_top: 64.0,
        margin_bottom: 64.0,
        margin_left: 64.0,
        margin_right: 64.0,
    };
    pub const LETTER: PageSize = PageSize::with_inch_margins(1056.0, 816.0);
    pub const LEGAL: PageSize = PageSize::with_inch_margins(1344.0, 816.0);
    pub const TABLOID: PageSize = PageSize::with_inch_margins(1632.0, 1056.0);

    const fn with_inch_margins(page_height: f32, page_width: f32) -> Self {
        Self {
            page_height,
            page_width,
            margin_top: 96.0,
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
        }
    }

    /// Look a preset up by name, case-insensitively
    pub fn named(name: &str) -> Option<PageSize> {
        match name.to_ascii_lowercase().as_str() {
            "a3" => Some(Self::A3),
            "a4" => Some(Self::A4),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::LETTER),
            "legal" => Some(Self::LEGAL),
            "tabloid" => Some(Self::TABLOID),
            _ => None,
        }
    }
}
