//! Self-contained HTML page: legend with totals, the treemap, the project
//! list and the tooltip. CSS and the hover script are inlined so the page
//! works when opened from disk or embedded in an iframe.

use std::fmt::Write;

use super::format::{format_money, format_percent};
use super::svg::render_treemap;
use super::{escape_html, num, RenderOptions, Variant};
use crate::layout::fill::fill_ratio;
use crate::layout::Layout;
use crate::ui::state::{ViewPhase, ViewState};
use crate::ui::tooltip::{build_tooltip, place_tooltip, TooltipState, OFFSET_X, OFFSET_Y};

/// Render the whole page for the current view state.
pub fn render_page(state: &ViewState, options: &RenderOptions) -> String {
    let body = match (&state.phase, &state.layout) {
        (ViewPhase::Empty, _) => String::new(),
        (ViewPhase::Loading { requested }, _) => format!(
            r#"<p class="status">Loading {requested} project{s}&hellip;</p>"#,
            s = if *requested == 1 { "" } else { "s" }
        ),
        (ViewPhase::Failed { message }, _) => format!(
            r#"<div class="error-banner" role="alert"><strong>Could not load the projects.</strong> {}</div>"#,
            escape_html(message)
        ),
        (ViewPhase::Ready, Some(layout)) => render_ready(state, layout, options),
        (ViewPhase::Ready, None) => String::new(),
    };

    let tooltip = state
        .tooltip
        .as_ref()
        .map(|t| render_tooltip(t, options))
        .unwrap_or_else(|| r#"<div class="tooltip" id="tooltip" hidden></div>"#.to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container" style="max-width: {max_width}px">
        {body}
    </div>
    {tooltip}
    <script>{js}</script>
</body>
</html>"#,
        title = escape_html(&options.title),
        css = inline_css(options),
        max_width = num(state.layout.as_ref().map(|l| l.width).unwrap_or(960.0)),
        js = inline_javascript(options),
    )
}

fn render_ready(state: &ViewState, layout: &Layout, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&render_legend(state, options));
    out.push_str(&render_issues(&state.issues));
    out.push_str(&render_treemap(layout, state, options));
    out.push_str(r#"<h5 class="listing-title">Project Listing</h5>"#);
    out.push_str(&render_listing(layout, options));
    out
}

fn render_legend(state: &ViewState, options: &RenderOptions) -> String {
    format!(
        r#"<div class="legend">
            <div class="legend-item"><span class="swatch" style="background-color: {budget_color}"></span><div>Budget: <span class="bold">{budget}</span></div></div>
            <div class="legend-item"><span class="swatch" style="background-color: {spent_color}"></span><div>Expenditure: <span class="bold">{expenditure}</span></div></div>
        </div>"#,
        budget_color = options.palette.budget.to_css(),
        spent_color = options.palette.expenditure.to_css(),
        budget = format_money(state.totals.budget),
        expenditure = format_money(state.totals.expenditure),
    )
}

fn render_issues(issues: &[(String, String)]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        r#"<div class="warning-banner" role="status"><strong>Some projects are not shown:</strong><ul>"#,
    );
    for (id, reason) in issues {
        let _ = write!(
            out,
            "<li><code>{}</code>: {}</li>",
            escape_html(id),
            escape_html(reason)
        );
    }
    out.push_str("</ul></div>");
    out
}

fn render_listing(layout: &Layout, options: &RenderOptions) -> String {
    let mut out = String::new();
    let container = match options.variant {
        Variant::StatCard => "listing",
        Variant::CardGrid => "listing card-grid",
    };
    let _ = write!(out, r#"<div class="{container}">"#);

    for leaf in &layout.leaves {
        let data = &leaf.data;
        let _ = write!(
            out,
            r#"<a class="card-link" href="{}" target="_blank" rel="noreferrer">"#,
            escape_html(&options.project_url(&data.id))
        );
        match options.variant {
            Variant::StatCard => {
                let _ = write!(
                    out,
                    r#"<div class="stat-card"><h6>{title}</h6><div class="flex-div"><div class="stat-half"><p>Budget</p><h4 class="bold">{budget}</h4></div><div class="stat-half"><p>Expenditure</p><h4 class="bold">{expenditure}</h4></div></div></div>"#,
                    title = escape_html(&data.title),
                    budget = format_money(data.budget),
                    expenditure = format_money(data.expenditure),
                );
            }
            Variant::CardGrid => {
                let _ = write!(
                    out,
                    r#"<div class="grid-card"><h6>{title}</h6><p>{budget} budget &middot; {spent} spent</p><div class="spend-bar"><span style="width: {width}%"></span></div></div>"#,
                    title = escape_html(&data.title),
                    budget = format_money(data.budget),
                    spent = format_percent(data.spend_ratio()),
                    width = num(fill_ratio(data.budget, data.expenditure) * 100.0),
                );
            }
        }
        out.push_str("</a>");
    }

    out.push_str("</div>");
    out
}

/// Tooltip for a hover captured in the state, placed against the configured viewport.
fn render_tooltip(tooltip: &TooltipState, options: &RenderOptions) -> String {
    let info = build_tooltip(&tooltip.data);
    let (vw, vh) = options.viewport;
    let placement = place_tooltip(tooltip.x_pos, tooltip.y_pos, vw, vh);
    format!(
        r#"<div class="tooltip" id="tooltip" style="left: {left}px; top: {top}px; transform: {transform}">{content}</div>"#,
        left = num(placement.left),
        top = num(placement.top),
        transform = placement.css_transform(),
        content = tooltip_content(
            &escape_html(&info.title),
            &info.budget_display,
            &info.expenditure_display,
            &info.spent_display,
            options
        ),
    )
}

fn tooltip_content(
    title: &str,
    budget: &str,
    expenditure: &str,
    spent: &str,
    options: &RenderOptions,
) -> String {
    format!(
        r#"<h6 class="bold">{title}</h6><div class="tooltip-row"><span class="swatch small" style="background-color: {budget_color}"></span><p>Budget</p><p class="bold">{budget}</p></div><div class="tooltip-row"><span class="swatch small" style="background-color: {spent_color}"></span><p>Expenditure</p><p class="bold">{expenditure}</p></div><div class="tooltip-row"><p>Spent</p><p class="bold">{spent}</p></div>"#,
        budget_color = options.palette.budget.to_css(),
        spent_color = options.palette.expenditure.to_css(),
    )
}

fn inline_css(options: &RenderOptions) -> String {
    let accent = options.palette.budget.to_css();
    let spent = options.palette.expenditure.to_css();
    let hover = options.palette.budget.lighten(0.2).to_css();
    format!(
        r#"
* {{ box-sizing: border-box; }}
body {{ font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #110848; margin: 0; padding: 1rem; }}
.container {{ margin: 0 auto; }}
.bold {{ font-weight: 700; }}
.legend {{ display: flex; gap: 4rem; justify-content: center; margin-bottom: 1rem; }}
.legend-item {{ display: flex; align-items: center; gap: 5px; }}
.swatch {{ display: inline-block; width: 1rem; height: 1rem; }}
.swatch.small {{ width: 0.75rem; height: 0.75rem; }}
.treemap {{ max-width: 100%; height: auto; display: block; }}
.treemap .project {{ cursor: pointer; }}
.listing-title {{ font-size: 1.25rem; margin: 2rem 0 1rem; }}
.listing {{ max-height: 40rem; overflow-y: auto; }}
.card-link {{ text-decoration: none; color: inherit; }}
.stat-card {{ background: #F7F7F7; padding: 1.5rem; margin-bottom: 1rem; border-left: 4px solid {accent}; }}
.card-link:hover .stat-card {{ border-left-color: {hover}; }}
.stat-card h6, .grid-card h6 {{ font-size: 1rem; margin: 0 0 1rem; }}
.stat-card .flex-div {{ display: flex; gap: 2rem; }}
.stat-half {{ width: calc(50% - 1rem); }}
.stat-half p {{ margin: 0 0 0.25rem; }}
.stat-half h4 {{ font-size: 1.5rem; margin: 0; }}
.card-grid {{ display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; }}
.grid-card {{ background: #F7F7F7; padding: 1rem; height: 100%; }}
.grid-card p {{ margin: 0 0 0.5rem; }}
.spend-bar {{ height: 0.5rem; background: {accent}; }}
.spend-bar span {{ display: block; height: 100%; background: {spent}; }}
.status {{ text-align: center; color: #55606E; }}
.error-banner {{ background: #FDEDEE; border: 1px solid #D12800; padding: 1rem; }}
.warning-banner {{ background: #FFF8E1; border: 1px solid #FBC412; padding: 1rem; margin-bottom: 1rem; }}
.tooltip {{ display: block; position: fixed; z-index: 10; border-radius: 5px; font-size: 0.875rem; padding: 1.24rem; background-color: #FAFAFA; border: 1px solid #D4D6D8; word-wrap: break-word; width: 20rem; pointer-events: none; }}
.tooltip[hidden] {{ display: none; }}
.tooltip h6 {{ font-size: 1rem; margin: 0 0 1rem; }}
.tooltip-row {{ display: flex; align-items: baseline; gap: 5px; }}
.tooltip-row p {{ margin: 0 0 0.25rem; }}
.tooltip-row p.bold {{ margin-left: auto; }}
"#
    )
}

/// Browser-side hover: same placement rules and dimming as the Rust view state.
fn inline_javascript(options: &RenderOptions) -> String {
    format!(
        r#"
(function () {{
  var tip = document.getElementById('tooltip');
  var groups = Array.prototype.slice.call(document.querySelectorAll('.treemap .project'));
  if (!tip || groups.length === 0) return;
  var budgetColor = '{budget_color}', spentColor = '{spent_color}', dimmed = '{dimmed}';
  function row(color, name, value) {{
    var swatch = color ? '<span class="swatch small" style="background-color: ' + color + '"></span>' : '';
    return '<div class="tooltip-row">' + swatch + '<p>' + name + '</p><p class="bold">' + value + '</p></div>';
  }}
  function esc(s) {{
    return s.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
  }}
  function show(g, e) {{
    var d = g.dataset;
    tip.innerHTML = '<h6 class="bold">' + esc(d.title) + '</h6>' +
      row(budgetColor, 'Budget', d.budget) + row(spentColor, 'Expenditure', d.expenditure) + row('', 'Spent', d.spent);
    var above = e.clientY > window.innerHeight / 2;
    var left = e.clientX > window.innerWidth / 2;
    tip.style.top = (above ? e.clientY + {offset_y} : e.clientY - {offset_y}) + 'px';
    tip.style.left = (left ? e.clientX - {offset_x} : e.clientX + {offset_x}) + 'px';
    tip.style.transform = 'translate(' + (left ? '-100%' : '0%') + ',' + (above ? '-100%' : '0%') + ')';
    tip.hidden = false;
    groups.forEach(function (other) {{ other.setAttribute('opacity', other === g ? '1' : dimmed); }});
  }}
  function hide() {{
    tip.hidden = true;
    groups.forEach(function (g) {{ g.setAttribute('opacity', '1'); }});
  }}
  groups.forEach(function (g) {{
    g.addEventListener('mouseover', function (e) {{ show(g, e); }});
    g.addEventListener('mousemove', function (e) {{ show(g, e); }});
    g.addEventListener('mouseleave', hide);
  }});
}})();
"#,
        budget_color = options.palette.budget.to_css(),
        spent_color = options.palette.expenditure.to_css(),
        dimmed = num(options.palette.dimmed_opacity as f64),
        offset_x = num(OFFSET_X),
        offset_y = num(OFFSET_Y),
    )
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

    fn ready(issues: Vec<(String, String)>) -> ViewState {
        let records = vec![
            ProjectRecord::new("A", "Alpha", 100.0, 50.0),
            ProjectRecord::new("B", "Beta & Co", 300.0, 300.0),
        ];
        let tree = build_hierarchy(&records);
        let layout = compute_layout(&tree, tree.root, 960.0, 520.0, &LayoutConfig::default());
        ViewState::default().apply(ViewEvent::DataReady {
            layout: Arc::new(layout),
            issues,
        })
    }

    #[test]
    fn empty_state_renders_only_the_shell() {
        let page = render_page(&ViewState::default(), &RenderOptions::default());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(!page.contains("<svg"));
        assert!(!page.contains("Project Listing"));
        assert!(page.contains(r#"id="tooltip" hidden"#));
    }

    #[test]
    fn ready_state_has_totals_treemap_and_listing() {
        let page = render_page(&ready(Vec::new()), &RenderOptions::default());
        assert!(page.contains("Budget: <span class=\"bold\">$400</span>"));
        assert!(page.contains("Expenditure: <span class=\"bold\">$350</span>"));
        assert!(page.contains("<svg"));
        assert_eq!(page.matches(r#"class="stat-card""#).count(), 2);
        assert!(page.contains("Beta &amp; Co"));
        assert!(!page.contains("warning-banner\""));
    }

    #[test]
    fn card_grid_variant() {
        let options = RenderOptions {
            variant: Variant::CardGrid,
            ..RenderOptions::default()
        };
        let page = render_page(&ready(Vec::new()), &options);
        assert!(page.contains(r#"class="listing card-grid""#));
        assert_eq!(page.matches(r#"class="grid-card""#).count(), 2);
        assert!(page.contains(r#"<span style="width: 50%">"#));
        assert!(page.contains(r#"<span style="width: 100%">"#));
    }

    #[test]
    fn issues_are_listed() {
        let page = render_page(
            &ready(vec![("C".into(), "server answered HTTP 404".into())]),
            &RenderOptions::default(),
        );
        assert!(page.contains(r#"<div class="warning-banner""#));
        assert!(page.contains("<code>C</code>: server answered HTTP 404"));
    }

    #[test]
    fn failure_shows_banner() {
        let state = ViewState::default().apply(ViewEvent::LoadFailed {
            message: "1 of 2 project requests failed".into(),
        });
        let page = render_page(&state, &RenderOptions::default());
        assert!(page.contains(r#"class="error-banner""#));
        assert!(page.contains("1 of 2 project requests failed"));
        assert!(!page.contains("<svg"));
    }

    #[test]
    fn loading_state() {
        let state = ViewState::default().apply(ViewEvent::LoadStarted { requested: 3 });
        let page = render_page(&state, &RenderOptions::default());
        assert!(page.contains("Loading 3 projects"));
    }

    #[test]
    fn hovered_state_places_tooltip() {
        let state = ready(Vec::new());
        let b = state.layout.as_ref().unwrap().leaves[1].clone();
        // Lower-right quadrant of a 1280x800 viewport
        let hovered = state.apply(ViewEvent::PointerMoved(PointerState {
            canvas_x: b.x0 + 10.0,
            canvas_y: b.y0 + 10.0,
            client_x: 1000.0,
            client_y: 700.0,
        }));
        let page = render_page(&hovered, &RenderOptions::default());
        assert!(page.contains(
            r#"style="left: 980px; top: 740px; transform: translate(-100%,-100%)""#
        ));
        assert!(page.contains("<h6 class=\"bold\">Beta &amp; Co</h6>"));
        assert!(page.contains("$300"));
    }
}
