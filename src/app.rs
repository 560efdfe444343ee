use std::sync::mpsc;
use std::sync::Arc;

use compact_str::CompactString;

use crate::config::Config;
use crate::layout;
use crate::loader::types::{LoadProgress, ProjectRecord};
use crate::loader::{self, LoadIssue, ProjectSource};
use crate::render::html::render_page;
use crate::tree::build_hierarchy;
use crate::ui::input::PointerState;
use crate::ui::state::{ViewEvent, ViewPhase, ViewState};

/// Top-level application state: the configuration, the records of the last
/// successful load and the current view.
pub struct App {
    pub config: Config,
    pub state: ViewState,

    // Data
    pub records: Vec<ProjectRecord>,
    issues: Vec<(String, String)>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: ViewState::default(),
            records: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Fetch the requested projects and lay them out.
    ///
    /// `None` or an empty list keeps the empty shell. A failed batch moves
    /// the view to [`ViewPhase::Failed`].
    pub fn load<S: ProjectSource>(
        &mut self,
        source: &S,
        ids: Option<&[CompactString]>,
        progress: Option<&mpsc::Sender<LoadProgress>>,
    ) {
        let ids = match ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                tracing::info!("No project identifiers requested");
                self.records.clear();
                self.issues.clear();
                self.state = ViewState::default();
                return;
            }
        };

        self.handle(ViewEvent::LoadStarted {
            requested: ids.len(),
        });

        match loader::load_projects(source, ids, self.config.fetch_policy, progress) {
            Ok(outcome) => {
                if !outcome.is_complete() {
                    tracing::warn!(
                        "{} of {} projects are not shown",
                        outcome.skipped.len() + outcome.failed.len(),
                        ids.len()
                    );
                }
                self.issues = outcome
                    .skipped
                    .iter()
                    .chain(outcome.failed.iter())
                    .map(issue_line)
                    .collect();
                self.records = outcome.records;
                self.relayout();
            }
            Err(e) => {
                tracing::error!("Load failed: {}", e);
                self.records.clear();
                self.issues.clear();
                self.handle(ViewEvent::LoadFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Recompute the hierarchy and layout from the stored records.
    pub fn relayout(&mut self) {
        let tree = build_hierarchy(&self.records);
        let computed = layout::compute_layout(
            &tree,
            tree.root,
            self.config.canvas_width,
            self.config.canvas_height,
            &self.config.layout_config(),
        );
        tracing::info!(
            "Layout ready: {} rectangles on {}x{}",
            computed.leaves.len(),
            self.config.canvas_width,
            self.config.canvas_height
        );
        self.handle(ViewEvent::DataReady {
            layout: Arc::new(computed),
            issues: self.issues.clone(),
        });
    }

    /// Change the canvas size; the layout is recomputed if data is shown.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        if self.state.phase == ViewPhase::Ready {
            self.relayout();
        }
    }

    /// Pointer at canvas coordinates, with the canvas drawn at the viewport origin.
    pub fn hover_at(&mut self, x: f64, y: f64) {
        self.handle(ViewEvent::PointerMoved(PointerState::from_canvas(
            x,
            y,
            (0.0, 0.0),
        )));
    }

    pub fn handle(&mut self, event: ViewEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    pub fn render_html(&self) -> String {
        render_page(&self.state, &self.config.render_options())
    }
}

fn issue_line(issue: &LoadIssue) -> (String, String) {
    let reason = match &issue.error {
        loader::LoadError::Invalid { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    (issue.id.to_string(), reason)
}
