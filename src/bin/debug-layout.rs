//! Diagnostic tool to verify records → hierarchy → layout → labels offline.
//!
//! Usage: `debug-layout doc1.json doc2.json ...` where every file is a
//! project document as served by the API; the file stem is the identifier.
use budget_treemap::layout::fill::compute_fill;
use budget_treemap::layout::{compute_layout, LayoutConfig};
use budget_treemap::loader::types::RawProjectEntry;
use budget_treemap::loader::{load_projects, FetchPolicy, LoadError, LoadResult, ProjectSource};
use budget_treemap::render::format::format_money;
use budget_treemap::render::labels::place_labels;
use budget_treemap::tree;
use compact_str::CompactString;
use std::collections::HashMap;
use std::path::PathBuf;

/// Documents read from disk up front, keyed by file stem.
struct FileSource {
    docs: HashMap<CompactString, String>,
}

impl ProjectSource for FileSource {
    fn fetch(&self, id: &str) -> LoadResult<RawProjectEntry> {
        let body = self.docs.get(id).ok_or_else(|| LoadError::Status {
            id: CompactString::new(id),
            status: 404,
        })?;
        serde_json::from_str(body).map_err(|source| LoadError::Decode {
            id: CompactString::new(id),
            source,
        })
    }
}

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 520.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("budget_treemap=debug".parse()?),
        )
        .init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: debug-layout <project.json>...");
    }

    println!("=== DIAGNOSTIC: Records → Layout Pipeline ===");

    let mut docs = HashMap::new();
    let mut ids = Vec::new();
    for path in &paths {
        let id = path
            .file_stem()
            .map(|s| CompactString::new(s.to_string_lossy()))
            .ok_or_else(|| anyhow::anyhow!("no file name in {}", path.display()))?;
        let body = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        docs.insert(id.clone(), body);
        ids.push(id);
    }
    let listed: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    println!("\n[1] Identifiers: {}", listed.join(", "));

    let outcome = load_projects(&FileSource { docs }, &ids, FetchPolicy::Partial, None)?;
    println!(
        "\n[2] Records: {} loaded, {} skipped, {} failed",
        outcome.records.len(),
        outcome.skipped.len(),
        outcome.failed.len()
    );
    for issue in outcome.skipped.iter().chain(outcome.failed.iter()) {
        println!("    ! {}: {}", issue.id, issue.error);
    }

    let tree = tree::build_hierarchy(&outcome.records);
    let root = tree.get(tree.root);
    println!(
        "\n[3] Hierarchy: {} nodes ({} leaves), root '{}' total budget {}",
        tree.len(),
        tree.leaves(tree.root).len(),
        root.name,
        format_money(root.value)
    );

    let layout = compute_layout(&tree, tree.root, WIDTH, HEIGHT, &LayoutConfig::default());
    println!("\n[4] Layout computed: {} rectangles", layout.leaves.len());

    println!("\n[5] Top 10 largest rectangles by area:");
    let mut sorted = layout.leaves.clone();
    sorted.sort_by(|a, b| b.area().total_cmp(&a.area()));
    for (i, leaf) in sorted.iter().take(10).enumerate() {
        println!(
            "    [{}] '{}' - rect: {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) - budget {}",
            i,
            leaf.data.title,
            leaf.width(),
            leaf.height(),
            leaf.area(),
            leaf.x0,
            leaf.y0,
            format_money(leaf.data.budget)
        );
    }

    println!("\n[6] Expenditure overlays:");
    for leaf in sorted.iter().take(10) {
        let fill = compute_fill(leaf);
        println!(
            "    '{}' - ratio {:.3}, overlay y={:.1} h={:.1}",
            leaf.data.id, fill.ratio, fill.y, fill.h
        );
    }

    println!("\n[7] Coverage:");
    let area_sum: f64 = layout.leaves.iter().map(|l| l.area()).sum();
    let canvas_area = WIDTH * HEIGHT;
    println!("    Total rect area: {:.0}px²", area_sum);
    println!("    Canvas area:     {:.0}px²", canvas_area);
    println!("    Coverage: {:.1}%", area_sum / canvas_area * 100.0);

    let labels = place_labels(&layout.leaves, WIDTH, HEIGHT);
    println!(
        "\n[8] Text label count: {} rects (out of {})",
        labels.len(),
        layout.leaves.len()
    );

    Ok(())
}
