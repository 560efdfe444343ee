use std::sync::Arc;

use crate::layout::Layout;
use crate::ui::input::{hit_test, PointerState};
use crate::ui::tooltip::TooltipState;

/// View state machine phases.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewPhase {
    /// No `projectIds` parameter: render the empty shell
    #[default]
    Empty,
    /// Batch in flight
    Loading { requested: usize },
    /// Layout available
    Ready,
    /// The batch failed; the message is shown to the user
    Failed { message: String },
}

/// Aggregate budget and expenditure over the drawn projects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub budget: f64,
    pub expenditure: f64,
    pub projects: usize,
}

impl Totals {
    pub fn from_layout(layout: &Layout) -> Self {
        layout.leaves.iter().fold(Self::default(), |acc, leaf| Self {
            budget: acc.budget + leaf.data.budget,
            expenditure: acc.expenditure + leaf.data.expenditure,
            projects: acc.projects + 1,
        })
    }
}

/// Events that move the view from one state to the next.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    LoadStarted { requested: usize },
    /// A fresh data snapshot; replaces the previous one and clears the tooltip.
    DataReady {
        layout: Arc<Layout>,
        /// Identifiers skipped or failed, with a human-readable reason
        issues: Vec<(String, String)>,
    },
    LoadFailed { message: String },
    PointerMoved(PointerState),
    PointerLeft,
}

/// Everything the page renders from. Never mutated in place: each event
/// produces a new value through [`ViewState::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub phase: ViewPhase,
    pub layout: Option<Arc<Layout>>,
    pub totals: Totals,
    pub issues: Vec<(String, String)>,
    pub tooltip: Option<TooltipState>,
}

impl ViewState {
    pub fn apply(self, event: ViewEvent) -> ViewState {
        match event {
            ViewEvent::LoadStarted { requested } => ViewState {
                phase: ViewPhase::Loading { requested },
                tooltip: None,
                ..self
            },
            ViewEvent::DataReady { layout, issues } => ViewState {
                phase: ViewPhase::Ready,
                totals: Totals::from_layout(&layout),
                layout: Some(layout),
                issues,
                tooltip: None,
            },
            ViewEvent::LoadFailed { message } => ViewState {
                phase: ViewPhase::Failed { message },
                layout: None,
                totals: Totals::default(),
                tooltip: None,
                ..self
            },
            ViewEvent::PointerMoved(pointer) => {
                let tooltip = self.layout.as_ref().and_then(|layout| {
                    hit_test(&layout.leaves, pointer.canvas_x, pointer.canvas_y).map(|i| {
                        TooltipState {
                            leaf: i,
                            data: layout.leaves[i].data.clone(),
                            x_pos: pointer.client_x,
                            y_pos: pointer.client_y,
                        }
                    })
                });
                ViewState { tooltip, ..self }
            }
            ViewEvent::PointerLeft => ViewState {
                tooltip: None,
                ..self
            },
        }
    }

    /// Opacity of leaf `index`: everything but the hovered leaf is dimmed
    /// while a tooltip is shown.
    pub fn leaf_opacity(&self, index: usize, dimmed: f32) -> f32 {
        match &self.tooltip {
            Some(t) if t.leaf != index => dimmed,
            _ => 1.0,
        }
    }
}
