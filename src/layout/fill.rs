use super::LayoutLeaf;

/// Expenditure overlay for one leaf: the bottom `ratio` share of its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Fill ratio actually drawn, clamped to `[0, 1]`
    pub ratio: f64,
}

/// Drawn fill ratio of a budget: `expenditure / budget` clamped to `[0, 1]`.
/// A zero budget draws nothing (ratio 0) instead of propagating NaN/inf.
pub fn fill_ratio(budget: f64, expenditure: f64) -> f64 {
    if budget <= 0.0 || !budget.is_finite() || !expenditure.is_finite() {
        return 0.0;
    }
    (expenditure / budget).clamp(0.0, 1.0)
}

/// Overlay rectangle nested in `leaf`, anchored to its bottom edge.
pub fn compute_fill(leaf: &LayoutLeaf) -> FillRect {
    let ratio = fill_ratio(leaf.data.budget, leaf.data.expenditure);
    let height = leaf.y1 - leaf.y0;
    let gap = (1.0 - ratio) * height;
    FillRect {
        x: leaf.x0,
        y: leaf.y0 + gap,
        w: leaf.x1 - leaf.x0,
        h: height - gap,
        ratio,
    }
}
