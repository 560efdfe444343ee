use crate::layout::LayoutLeaf;

const MIN_LABEL_WIDTH: f64 = 70.0;
const MIN_LABEL_HEIGHT: f64 = 20.0;
const MIN_LABEL_AREA: f64 = 8_000.0;
const MIN_LABEL_AREA_FRACTION: f64 = 0.003;
const MAX_LABELS: usize = 24;
const LABEL_PAD: f64 = 3.0;

/// A title label placed inside a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Index of the leaf in `Layout::leaves`
    pub leaf: usize,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub text: String,
    /// Bounds `[x1, y1, x2, y2]` of the label box, used for overlap checks
    pub bounds: [f64; 4],
}

/// Pick the leaves large enough to carry a readable title, largest first.
pub fn place_labels(leaves: &[LayoutLeaf], canvas_w: f64, canvas_h: f64) -> Vec<Label> {
    let min_area = (canvas_w * canvas_h * MIN_LABEL_AREA_FRACTION).max(MIN_LABEL_AREA);
    let mut candidates: Vec<(usize, &LayoutLeaf)> = leaves
        .iter()
        .enumerate()
        .filter(|(_, l)| {
            l.area() >= min_area && l.width() >= MIN_LABEL_WIDTH && l.height() >= MIN_LABEL_HEIGHT
        })
        .collect();
    // Stable sort keeps input order among equal areas.
    candidates.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()));

    let mut labels: Vec<Label> = Vec::with_capacity(MAX_LABELS);
    for (index, leaf) in candidates {
        if labels.len() >= MAX_LABELS {
            break;
        }

        let max_text_w = leaf.width() - LABEL_PAD * 2.0;
        let font_size = (leaf.height() * 0.18).clamp(10.0, 16.0);
        let text = truncate_label(&leaf.data.title, max_text_w, font_size);
        if text.is_empty() {
            continue;
        }

        let text_w = approx_text_width(&text, font_size);
        let text_h = font_size * 1.2;
        if text_h > leaf.height() - LABEL_PAD * 2.0 {
            continue;
        }

        let x = leaf.x0 + LABEL_PAD;
        let y = leaf.y0 + LABEL_PAD;
        let bounds = [x, y, x + text_w + 2.0, y + text_h + 2.0];
        if labels.iter().any(|l| rects_overlap(l.bounds, bounds)) {
            continue;
        }

        labels.push(Label {
            leaf: index,
            x: x + 1.0,
            y: y + 1.0 + font_size,
            font_size,
            text,
            bounds,
        });
    }

    tracing::debug!("Placed {} labels for {} leaves", labels.len(), leaves.len());
    labels
}

fn approx_char_width(font_size: f64) -> f64 {
    (font_size * 0.58).max(1.0)
}

fn approx_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * approx_char_width(font_size)
}

fn rects_overlap(a: [f64; 4], b: [f64; 4]) -> bool {
    a[0] < b[2] && a[2] > b[0] && a[1] < b[3] && a[3] > b[1]
}

/// Shorten `name` to what fits in `max_width` at `font_size`, ending in `...`.
pub fn truncate_label(name: &str, max_width: f64, font_size: f64) -> String {
    if max_width <= 0.0 {
        return String::new();
    }
    let max_chars = (max_width / approx_char_width(font_size)) as usize;
    if max_chars < 3 {
        return String::new();
    }
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }
    let keep = max_chars - 3;
    let truncated: String = name.chars().take(keep).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::types::ProjectRecord;
    use crate::tree::arena::NodeId;

    fn leaf(index: usize, x0: f64, y0: f64, x1: f64, y1: f64, title: &str) -> LayoutLeaf {
        LayoutLeaf {
            node: NodeId(index as u32 + 1),
            index,
            x0,
            y0,
            x1,
            y1,
            data: ProjectRecord::new("P", title, 1.0, 0.0),
        }
    }

    #[test]
    fn truncates_with_ellipsis() {
        // 10px font → 5.8px per char → 10 chars in 60px
        assert_eq!(truncate_label("Governance and Peacebuilding", 60.0, 10.0), "Governa...");
        assert_eq!(truncate_label("Short", 60.0, 10.0), "Short");
        assert_eq!(truncate_label("Anything", 10.0, 10.0), "");
    }

    #[test]
    fn small_leaves_get_no_label() {
        let leaves = vec![
            leaf(0, 0.0, 0.0, 500.0, 300.0, "Big project"),
            leaf(1, 500.0, 0.0, 560.0, 300.0, "Too narrow"),
            leaf(2, 0.0, 300.0, 500.0, 315.0, "Too flat"),
        ];
        let labels = place_labels(&leaves, 960.0, 520.0);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].leaf, 0);
        assert_eq!(labels[0].text, "Big project");
        assert_eq!(labels[0].font_size, 16.0);
    }

    #[test]
    fn largest_leaves_first() {
        let leaves = vec![
            leaf(0, 0.0, 0.0, 200.0, 100.0, "Small"),
            leaf(1, 200.0, 0.0, 960.0, 520.0, "Large"),
        ];
        let labels = place_labels(&leaves, 960.0, 520.0);
        let order: Vec<_> = labels.iter().map(|l| l.leaf).collect();
        assert_eq!(order, [1, 0]);
    }

    #[test]
    fn label_count_is_capped() {
        let leaves: Vec<LayoutLeaf> = (0..30)
            .map(|i| {
                let x0 = (i % 6) as f64 * 160.0;
                let y0 = (i / 6) as f64 * 104.0;
                leaf(i, x0, y0, x0 + 150.0, y0 + 100.0, &format!("Project {i}"))
            })
            .collect();
        let labels = place_labels(&leaves, 960.0, 520.0);
        assert_eq!(labels.len(), MAX_LABELS);
        // Equal areas keep input order, so the first 24 leaves win
        assert!(labels.iter().enumerate().all(|(n, l)| l.leaf == n));
    }

    #[test]
    fn no_leaves_no_labels() {
        assert!(place_labels(&[], 960.0, 520.0).is_empty());
    }
}
