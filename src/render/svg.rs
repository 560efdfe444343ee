use std::fmt::Write;

use super::format::{format_money, format_percent};
use super::labels::place_labels;
use super::{escape_html, num, RenderOptions};
use crate::layout::fill::compute_fill;
use crate::layout::Layout;
use crate::ui::state::ViewState;

/// Build the treemap `<svg>`: one linked group per project with the
/// budget rectangle, the expenditure overlay and an optional title label.
pub fn render_treemap(layout: &Layout, state: &ViewState, options: &RenderOptions) -> String {
    let palette = &options.palette;
    let mut svg = String::with_capacity(256 + layout.leaves.len() * 512);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="treemap" width="{w}px" viewBox="0 0 {w} {h}" role="img" aria-label="Budget treemap">"#,
        w = num(layout.width),
        h = num(layout.height),
    );

    let labels = if options.show_labels {
        place_labels(&layout.leaves, layout.width, layout.height)
    } else {
        Vec::new()
    };

    for (i, leaf) in layout.leaves.iter().enumerate() {
        let fill = compute_fill(leaf);
        let data = &leaf.data;
        let title = escape_html(&data.title);
        let opacity = state.leaf_opacity(i, palette.dimmed_opacity);

        let _ = write!(
            svg,
            r#"<a href="{href}" target="_blank" rel="noreferrer"><g class="project" data-index="{i}" data-title="{title}" data-budget="{budget}" data-expenditure="{expenditure}" data-spent="{spent}" opacity="{opacity}"><title>{title}</title>"#,
            href = escape_html(&options.project_url(&data.id)),
            budget = format_money(data.budget),
            expenditure = format_money(data.expenditure),
            spent = format_percent(data.spend_ratio()),
            opacity = num(opacity as f64),
        );
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(leaf.x0),
            num(leaf.y0),
            num(leaf.width()),
            num(leaf.height()),
            palette.budget.to_css(),
        );
        let _ = write!(
            svg,
            r#"<rect class="spent" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(fill.x),
            num(fill.y),
            num(fill.w),
            num(fill.h),
            palette.expenditure.to_css(),
        );

        if let Some(label) = labels.iter().find(|l| l.leaf == i) {
            let [bx0, by0, bx1, by1] = label.bounds;
            let _ = write!(
                svg,
                r#"<rect class="label-bg" x="{}" y="{}" width="{}" height="{}" fill="{}"/><text x="{}" y="{}" font-size="{}" fill="{}">{}</text>"#,
                num(bx0),
                num(by0),
                num(bx1 - bx0),
                num(by1 - by0),
                palette.label_background.to_css(),
                num(label.x),
                num(label.y),
                num(label.font_size),
                palette.label_text.to_css(),
                escape_html(&label.text),
            );
        }

        svg.push_str("</g></a>");
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::loader::types::ProjectRecord;
    use crate::tree::build_hierarchy;
    use crate::ui::input::PointerState;
    use crate::ui::state::ViewEvent;
    use std::sync::Arc;

    fn scenario() -> (Arc<Layout>, ViewState) {
        let records = vec![
            ProjectRecord::new("A", "Alpha <Phase I>", 100.0, 50.0),
            ProjectRecord::new("B", "Beta", 300.0, 300.0),
        ];
        let tree = build_hierarchy(&records);
        let layout = Arc::new(compute_layout(
            &tree,
            tree.root,
            960.0,
            520.0,
            &LayoutConfig::default(),
        ));
        let state = ViewState::default().apply(ViewEvent::DataReady {
            layout: layout.clone(),
            issues: Vec::new(),
        });
        (layout, state)
    }

    #[test]
    fn one_group_per_project() {
        let (layout, state) = scenario();
        let svg = render_treemap(&layout, &state, &RenderOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 960 520""#));
        assert_eq!(svg.matches(r#"<g class="project""#).count(), 2);
        assert_eq!(svg.matches(r#"class="spent""#).count(), 2);
        assert!(svg.contains("https://open.undp.org/projects/A"));
        assert!(svg.contains("Alpha &lt;Phase I&gt;"));
        assert!(!svg.contains("<Phase I>"));
    }

    #[test]
    fn overlay_geometry_is_written() {
        let (layout, state) = scenario();
        let svg = render_treemap(&layout, &state, &RenderOptions::default());
        let a = &layout.leaves[0];
        let fill = compute_fill(a);
        let expected = format!(
            r#"<rect class="spent" x="{}" y="{}" width="{}" height="{}""#,
            num(fill.x),
            num(fill.y),
            num(fill.w),
            num(fill.h)
        );
        assert!(svg.contains(&expected), "{expected} not in {svg}");
    }

    #[test]
    fn labels_can_be_turned_off() {
        let (layout, state) = scenario();
        let with = render_treemap(&layout, &state, &RenderOptions::default());
        assert!(with.contains("<text"));
        let options = RenderOptions {
            show_labels: false,
            ..RenderOptions::default()
        };
        let without = render_treemap(&layout, &state, &options);
        assert!(!without.contains("<text"));
    }

    #[test]
    fn hovered_group_stays_opaque() {
        let (layout, state) = scenario();
        let b = &layout.leaves[1];
        let hovered = state.apply(ViewEvent::PointerMoved(PointerState::from_canvas(
            b.x0 + 5.0,
            b.y0 + 5.0,
            (0.0, 0.0),
        )));
        let svg = render_treemap(&layout, &hovered, &RenderOptions::default());
        assert!(svg.contains(r#"data-index="0" "#));
        assert_eq!(svg.matches(r#"opacity="0.4""#).count(), 1);
        assert_eq!(svg.matches(r#"opacity="1""#).count(), 1);
    }

    #[test]
    fn empty_layout_is_an_empty_canvas() {
        let layout = Layout::empty(960.0, 520.0);
        let svg = render_treemap(&layout, &ViewState::default(), &RenderOptions::default());
        assert_eq!(svg.matches("<g").count(), 0);
        assert!(svg.ends_with("</svg>"));
    }
}
