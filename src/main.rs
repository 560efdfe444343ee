use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use compact_str::CompactString;

use budget_treemap::app::App;
use budget_treemap::config::{Config, DEFAULT_ENDPOINT, DEFAULT_PROJECT_URL};
use budget_treemap::loader::http::HttpSource;
use budget_treemap::loader::query::{parse_project_ids, split_ids};
use budget_treemap::loader::types::LoadProgress;
use budget_treemap::loader::FetchPolicy;
use budget_treemap::render::Variant;
use budget_treemap::ui::state::ViewPhase;

/// Render a budget/expenditure treemap report for a set of projects.
#[derive(Debug, Parser)]
#[command(name = "budget-treemap", version, about)]
struct Cli {
    /// Page URL or query string carrying `projectIds=ID1~ID2`
    #[arg(long, conflicts_with = "project_ids")]
    query: Option<String>,

    /// Bare identifier list, `~`-separated
    #[arg(long)]
    project_ids: Option<String>,

    /// Write the page here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Variant::StatCard)]
    variant: Variant,

    /// Do not draw project titles inside the rectangles
    #[arg(long)]
    no_labels: bool,

    /// Show the projects that loaded even if some requests failed
    #[arg(long)]
    allow_partial: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Project document endpoint, `{id}` is substituted
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Outbound project link, `{id}` is substituted
    #[arg(long, default_value = DEFAULT_PROJECT_URL)]
    project_url: String,

    #[arg(long, default_value_t = 960.0)]
    width: f64,

    #[arg(long, default_value_t = 520.0)]
    height: f64,

    #[arg(long, default_value_t = 2.0)]
    padding: f64,

    /// Render with the pointer at canvas position `X,Y`
    #[arg(long, value_parser = parse_point)]
    hover_at: Option<(f64, f64)>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            canvas_width: self.width,
            canvas_height: self.height,
            padding: self.padding,
            endpoint_template: self.endpoint.clone(),
            project_url_template: self.project_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            fetch_policy: if self.allow_partial {
                FetchPolicy::Partial
            } else {
                FetchPolicy::AllOrNothing
            },
            variant: self.variant,
            show_labels: !self.no_labels,
            ..Config::default()
        }
    }

    fn project_ids(&self) -> Result<Option<Vec<CompactString>>> {
        if let Some(list) = &self.project_ids {
            return Ok(Some(split_ids(list)));
        }
        match &self.query {
            Some(query) => Ok(parse_project_ids(query)?),
            None => Ok(None),
        }
    }
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

/// Log fetch progress until the sender side is dropped; returns how many
/// requests finished.
fn report_progress(rx: mpsc::Receiver<LoadProgress>) -> usize {
    let mut done = 0usize;
    let mut total = 0usize;
    for progress in rx {
        match progress {
            LoadProgress::Started { total: t } => total = t,
            LoadProgress::Fetched { id } => {
                done += 1;
                tracing::debug!("[{}/{}] fetched {}", done, total, id);
            }
            LoadProgress::Failed { id, message } => {
                done += 1;
                tracing::warn!("[{}/{}] {} failed: {}", done, total, id, message);
            }
            LoadProgress::Completed {
                loaded,
                failed,
                elapsed_ms,
            } => tracing::info!(
                "Fetch finished in {} ms ({} loaded, {} not shown)",
                elapsed_ms,
                loaded,
                failed
            ),
        }
    }
    done
}

fn join_reporter<T>(handle: JoinHandle<T>) -> Option<T> {
    match handle.join() {
        Ok(v) => Some(v),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("Progress reporter thread panicked: {}", reason);
            None
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so the page can be piped from stdout
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("budget_treemap=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let ids = cli.project_ids()?;

    let source = HttpSource::new(&config.endpoint_template, config.timeout)
        .context("Failed to set up the HTTP client")?;
    let mut app = App::new(config);

    // Progress reporter, fed from the fetch workers
    let (tx, rx) = mpsc::channel();
    let reporter = std::thread::spawn(move || report_progress(rx));

    app.load(&source, ids.as_deref(), Some(&tx));
    drop(tx);
    join_reporter(reporter);

    if let Some((x, y)) = cli.hover_at {
        app.hover_at(x, y);
    }

    let page = app.render_html();
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &page)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", page.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(page.as_bytes())
                .context("Failed to write the page to stdout")?;
            stdout.flush()?;
        }
    }

    if let ViewPhase::Failed { message } = &app.state.phase {
        bail!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_counts_finished_requests() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoadProgress::Started { total: 2 }).unwrap();
        tx.send(LoadProgress::Fetched { id: CompactString::new("A") }).unwrap();
        tx.send(LoadProgress::Failed {
            id: CompactString::new("B"),
            message: "HTTP 500".into(),
        })
        .unwrap();
        drop(tx);
        let handle = std::thread::spawn(move || report_progress(rx));
        assert_eq!(join_reporter(handle), Some(2));
    }

    #[test]
    fn panicked_reporter_is_not_swallowed() {
        let handle = std::thread::spawn(|| -> usize { panic!("reporter died") });
        assert_eq!(join_reporter(handle), None);
    }

    #[test]
    fn hover_point_parsing() {
        assert_eq!(parse_point("10, 20.5"), Ok((10.0, 20.5)));
        assert!(parse_point("10").is_err());
    }
}
