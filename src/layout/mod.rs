pub mod fill;
pub mod squarify;

use crate::loader::types::ProjectRecord;
use crate::tree::arena::{NodeId, ProjectTree};

use self::squarify::{squarify, Tile, PHI};

/// A project's rectangle in canvas coordinates, plus its source record.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLeaf {
    pub node: NodeId,
    /// Position of the record in the input sequence
    pub index: usize,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub data: ProjectRecord,
}

impl LayoutLeaf {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-open containment test used for pointer hit-testing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// The full layout result for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// One leaf per record, in input order
    pub leaves: Vec<LayoutLeaf>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            leaves: Vec::new(),
            width,
            height,
        }
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Gap between adjacent rectangles and between rectangles and the canvas edge
    pub padding: f64,
    /// Target aspect ratio for squarified rows
    pub aspect_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 2.0,
            aspect_ratio: PHI,
        }
    }
}

/// Compute the treemap for `root` over a `width × height` canvas.
///
/// Inner nodes are inset by `padding` and their children partitioned
/// inside with `padding / 2` kept on every side of each child, so
/// neighbours end up `padding` apart. Insets never go negative: an
/// over-padded rectangle collapses to its midpoint.
pub fn compute_layout(
    tree: &ProjectTree,
    root: NodeId,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Layout {
    let mut leaves = Vec::with_capacity(tree.len().saturating_sub(1));

    let root_value = tree.get(root).value;
    if root_value <= 0.0 && !tree.is_empty() {
        tracing::warn!(
            "Total budget of '{}' is {}; every rectangle will be empty",
            tree.get(root).name,
            root_value
        );
    }

    let canvas = Tile {
        x0: 0.0,
        y0: 0.0,
        x1: width.max(0.0),
        y1: height.max(0.0),
    };
    layout_node(tree, root, canvas, 0.0, config, &mut leaves);

    tracing::debug!(
        "Layout computed: {} leaves in {:.0}x{:.0}",
        leaves.len(),
        width,
        height
    );

    Layout {
        leaves,
        width,
        height,
    }
}

fn layout_node(
    tree: &ProjectTree,
    id: NodeId,
    rect: Tile,
    inset: f64,
    config: &LayoutConfig,
    leaves: &mut Vec<LayoutLeaf>,
) {
    let rect = shrink(rect, inset);
    let node = tree.get(id);

    if node.is_leaf() {
        if let (Some(data), Some(index)) = (&node.data, node.source_index) {
            leaves.push(LayoutLeaf {
                node: id,
                index,
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
                data: data.clone(),
            });
        }
        return;
    }

    let padding = config.padding.max(0.0);
    let half = padding / 2.0;
    let inner = shrink(rect, padding - half);

    let children: Vec<NodeId> = tree.children(id).collect();
    let values: Vec<f64> = children
        .iter()
        .map(|&c| tree.get(c).value.max(0.0))
        .collect();
    let tiles = squarify(
        &values,
        config.aspect_ratio,
        inner.x0,
        inner.y0,
        inner.x1,
        inner.y1,
    );

    for (&child, tile) in children.iter().zip(tiles) {
        layout_node(tree, child, tile, half, config, leaves);
    }
}

/// Inset a rectangle on every side, collapsing to the midpoint instead of inverting.
fn shrink(rect: Tile, by: f64) -> Tile {
    let (mut x0, mut y0, mut x1, mut y1) = (rect.x0 + by, rect.y0 + by, rect.x1 - by, rect.y1 - by);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Tile { x0, y0, x1, y1 }
}
