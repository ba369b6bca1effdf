//! CSS custom properties consumed by the presentation rules

use crate::pagination::PageGeometry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const PAGE_CONTENT_FIRST: &str = "--rm-page-content-first";
pub const PAGE_CONTENT_GENERAL: &str = "--rm-page-content-general";
pub const MAX_CONTENT_CHILD_HEIGHT: &str = "--rm-max-content-child-height";

/// Variable holding the body height of a specific page
pub fn page_content_var(page: u32) -> String {
    format!("--rm-page-content-{}", page)
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

/// Ordered set of size variables plus the editor min-height
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVars {
    vars: BTreeMap<String, String>,
    min_height: Option<f32>,
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables derived directly from the page geometry
    pub fn from_geometry(geometry: &PageGeometry) -> Self {
        let mut vars = Self::new();
        vars.set("--rm-page-height", px(geometry.page_height));
        vars.set("--rm-page-width", px(geometry.page_width));
        vars.set("--rm-page-gap", px(geometry.page_gap));
        vars.set("--rm-margin-top", px(geometry.margins.top));
        vars.set("--rm-margin-bottom", px(geometry.margins.bottom));
        vars.set("--rm-margin-left", px(geometry.margins.left));
        vars.set("--rm-margin-right", px(geometry.margins.right));
        vars.set("--rm-content-margin-top", px(geometry.content_margins.top));
        vars.set("--rm-content-margin-bottom", px(geometry.content_margins.bottom));
        vars.set("--rm-page-gap-border-size", px(geometry.gap_border_size));
        vars.set("--rm-page-gap-border-color", geometry.gap_border_color.clone());
        vars.set("--rm-page-break-background", geometry.page_break_background.clone());
        vars
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn set_px(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, px(value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Numeric value of a `px` variable
    pub fn px(&self, name: &str) -> Option<f32> {
        self.get(name)?.strip_suffix("px")?.trim().parse().ok()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether both hold the same variables, ignoring the min-height
    pub fn same_vars(&self, other: &StyleVars) -> bool {
        self.vars == other.vars
    }

    pub fn min_height(&self) -> Option<f32> {
        self.min_height
    }

    pub fn set_min_height(&mut self, min_height: Option<f32>) {
        self.min_height = min_height;
    }

    /// Render as `--name: value;` declarations, one per line
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (name, value) in &self.vars {
            let _ = writeln!(css, "{}: {};", name, value);
        }
        if let Some(min_height) = self.min_height {
            let _ = writeln!(css, "min-height: {}px;", min_height);
        }
        css
    }
}
