pub mod colors;
pub mod format;
pub mod html;
pub mod labels;
pub mod svg;

use clap::ValueEnum;

use self::colors::Palette;
use crate::loader::http::expand_template;

/// Presentation variant of the page. Both share the treemap; they differ
/// in how the project list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Full-width cards with budget and expenditure side by side
    #[default]
    StatCard,
    /// Two-column grid of compact cards with a spend bar
    CardGrid,
}

/// Everything the renderers need besides the view state.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub variant: Variant,
    pub show_labels: bool,
    pub palette: Palette,
    /// Outbound link per project, `{id}` is substituted
    pub project_url_template: String,
    /// Viewport used to place a tooltip present in the state (px)
    pub viewport: (f64, f64),
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            show_labels: true,
            palette: Palette::default(),
            project_url_template: crate::config::DEFAULT_PROJECT_URL.to_string(),
            viewport: (1280.0, 800.0),
            title: "Project budget and expenditure".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn project_url(&self, id: &str) -> String {
        expand_template(&self.project_url_template, id)
    }
}

/// Escape text for HTML/SVG content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Coordinates are written with at most two decimals and no trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
