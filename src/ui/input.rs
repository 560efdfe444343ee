use crate::layout::LayoutLeaf;

/// Pointer position in both coordinate spaces the view cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Canvas (SVG user-space) coordinates, used for hit-testing
    pub canvas_x: f64,
    pub canvas_y: f64,
    /// Client (viewport) coordinates, used for tooltip placement
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerState {
    /// Pointer over an SVG drawn at its logical size with its top-left corner
    /// at `origin` in the viewport.
    pub fn from_canvas(canvas_x: f64, canvas_y: f64, origin: (f64, f64)) -> Self {
        Self {
            canvas_x,
            canvas_y,
            client_x: origin.0 + canvas_x,
            client_y: origin.1 + canvas_y,
        }
    }
}

/// Hit-test: find which leaf contains the given canvas point.
/// Padding gaps and zero-area leaves never match.
pub fn hit_test(leaves: &[LayoutLeaf], x: f64, y: f64) -> Option<usize> {
    // Later leaves are drawn on top
    leaves.iter().rposition(|leaf| leaf.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::types::ProjectRecord;
    use crate::tree::arena::NodeId;

    fn leaf(index: usize, x0: f64, x1: f64) -> LayoutLeaf {
        LayoutLeaf {
            node: NodeId(index as u32 + 1),
            index,
            x0,
            y0: 0.0,
            x1,
            y1: 100.0,
            data: ProjectRecord::new("P", "P", 1.0, 0.0),
        }
    }

    #[test]
    fn finds_leaf_and_misses_padding() {
        let leaves = vec![leaf(0, 2.0, 48.0), leaf(1, 52.0, 98.0)];
        assert_eq!(hit_test(&leaves, 10.0, 10.0), Some(0));
        assert_eq!(hit_test(&leaves, 60.0, 99.0), Some(1));
        assert_eq!(hit_test(&leaves, 50.0, 10.0), None);
        assert_eq!(hit_test(&leaves, 10.0, 100.0), None);
    }

    #[test]
    fn zero_area_leaf_is_never_hit() {
        let leaves = vec![leaf(0, 30.0, 30.0)];
        assert_eq!(hit_test(&leaves, 30.0, 50.0), None);
    }

    #[test]
    fn client_coordinates_follow_origin() {
        let p = PointerState::from_canvas(10.0, 20.0, (100.0, 50.0));
        assert_eq!((p.client_x, p.client_y), (110.0, 70.0));
    }
}
