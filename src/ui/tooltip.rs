use crate::loader::types::ProjectRecord;
use crate::render::format::{format_money, format_percent};

/// Tooltip offset from the pointer, vertical axis (px).
pub const OFFSET_Y: f64 = 40.0;
/// Tooltip offset from the pointer, horizontal axis (px).
pub const OFFSET_X: f64 = 20.0;

/// The project under the pointer and where the pointer is, in client
/// (viewport) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    /// Index of the hovered leaf in the current layout
    pub leaf: usize,
    pub data: ProjectRecord,
    pub x_pos: f64,
    pub y_pos: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalSide {
    Left,
    Right,
}

/// Fixed-position box geometry for the tooltip element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
    pub vertical: VerticalSide,
    pub horizontal: HorizontalSide,
}

impl TooltipPlacement {
    /// CSS `translate(...)` that pulls the box to the pointer's far side.
    pub fn css_transform(&self) -> String {
        let tx = match self.horizontal {
            HorizontalSide::Left => "-100%",
            HorizontalSide::Right => "0%",
        };
        let ty = match self.vertical {
            VerticalSide::Above => "-100%",
            VerticalSide::Below => "0%",
        };
        format!("translate({tx},{ty})")
    }
}

/// Place the tooltip on the side of the pointer facing the larger part of
/// the viewport: above when the pointer is in the lower half, left when it
/// is in the right half.
pub fn place_tooltip(x: f64, y: f64, viewport_w: f64, viewport_h: f64) -> TooltipPlacement {
    let vertical = if y > viewport_h / 2.0 {
        VerticalSide::Above
    } else {
        VerticalSide::Below
    };
    let horizontal = if x > viewport_w / 2.0 {
        HorizontalSide::Left
    } else {
        HorizontalSide::Right
    };

    let top = match vertical {
        VerticalSide::Above => y + OFFSET_Y,
        VerticalSide::Below => y - OFFSET_Y,
    };
    let left = match horizontal {
        HorizontalSide::Left => x - OFFSET_X,
        HorizontalSide::Right => x + OFFSET_X,
    };

    TooltipPlacement {
        left,
        top,
        vertical,
        horizontal,
    }
}

/// Information to display in the tooltip for a project.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub title: String,
    pub budget_display: String,
    pub expenditure_display: String,
    pub spent_display: String,
}

pub fn build_tooltip(data: &ProjectRecord) -> TooltipInfo {
    TooltipInfo {
        title: data.title.clone(),
        budget_display: format_money(data.budget),
        expenditure_display: format_money(data.expenditure),
        spent_display: format_percent(data.spend_ratio()),
    }
}
