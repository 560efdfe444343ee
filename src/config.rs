use std::time::Duration;

use crate::layout::LayoutConfig;
use crate::loader::FetchPolicy;
use crate::render::colors::Palette;
use crate::render::{RenderOptions, Variant};

/// Project document endpoint; `{id}` is replaced by the identifier.
pub const DEFAULT_ENDPOINT: &str = "https://api.open.undp.org/api/projects/{id}.json";
/// Public project page linked from every card and rectangle.
pub const DEFAULT_PROJECT_URL: &str = "https://open.undp.org/projects/{id}";

/// Runtime settings, filled from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logical canvas size (px)
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub padding: f64,
    pub endpoint_template: String,
    pub project_url_template: String,
    pub timeout: Duration,
    pub fetch_policy: FetchPolicy,
    pub variant: Variant,
    pub show_labels: bool,
    /// Viewport assumed when placing a tooltip in a static render
    pub viewport: (f64, f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 520.0,
            padding: 2.0,
            endpoint_template: DEFAULT_ENDPOINT.to_string(),
            project_url_template: DEFAULT_PROJECT_URL.to_string(),
            timeout: Duration::from_secs(30),
            fetch_policy: FetchPolicy::AllOrNothing,
            variant: Variant::StatCard,
            show_labels: true,
            viewport: (1280.0, 800.0),
        }
    }
}

impl Config {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            padding: self.padding,
            ..LayoutConfig::default()
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            variant: self.variant,
            show_labels: self.show_labels,
            palette: Palette::default(),
            project_url_template: self.project_url_template.clone(),
            viewport: self.viewport,
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!((config.canvas_width, config.canvas_height), (960.0, 520.0));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch_policy, FetchPolicy::AllOrNothing);
        assert_eq!(config.layout_config().padding, 2.0);
    }

    #[test]
    fn render_options_follow_config() {
        let config = Config {
            variant: Variant::CardGrid,
            show_labels: false,
            project_url_template: "https://example.org/p/{id}".into(),
            ..Config::default()
        };
        let options = config.render_options();
        assert_eq!(options.variant, Variant::CardGrid);
        assert!(!options.show_labels);
        assert_eq!(options.project_url("X1"), "https://example.org/p/X1");
    }
}
