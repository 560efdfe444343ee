pub mod http;
pub mod query;
pub mod types;

use std::sync::mpsc;
use std::time::Instant;

use compact_str::CompactString;
use rayon::prelude::*;
use thiserror::Error;

use self::types::{LoadProgress, ProjectRecord, RawProjectEntry};

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Data-quality problems in an otherwise well-formed document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing or non-numeric '{0}'")]
    Missing(&'static str),
    #[error("'{field}' is not a finite number ({value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("'budget' is negative ({0})")]
    NegativeBudget(f64),
    #[error("'expenditure' is negative ({0})")]
    NegativeExpenditure(f64),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request for project {id} failed: {source}")]
    Http {
        id: CompactString,
        #[source]
        source: reqwest::Error,
    },
    #[error("project {id}: server answered HTTP {status}")]
    Status { id: CompactString, status: u16 },
    #[error("project {id}: response is not a project document: {source}")]
    Decode {
        id: CompactString,
        #[source]
        source: serde_json::Error,
    },
    #[error("project {id}: {source}")]
    Invalid {
        id: CompactString,
        #[source]
        source: RecordError,
    },
    #[error("{failed} of {total} project requests failed; first error: {first}")]
    Batch {
        failed: usize,
        total: usize,
        first: Box<LoadError>,
    },
}

/// Where project documents come from. The HTTP implementation lives in
/// [`http::HttpSource`]; tests use an in-memory source.
pub trait ProjectSource: Sync {
    fn fetch(&self, id: &str) -> LoadResult<RawProjectEntry>;
}

/// What to do when some requests of the batch fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Any failed request fails the whole batch.
    #[default]
    AllOrNothing,
    /// Keep the successful records and report the failed identifiers.
    Partial,
}

/// One identifier that did not make it into the record set.
#[derive(Debug)]
pub struct LoadIssue {
    pub id: CompactString,
    pub error: LoadError,
}

/// Result of a joined batch.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Valid records, in request order
    pub records: Vec<ProjectRecord>,
    /// Documents that arrived but failed validation (always skipped)
    pub skipped: Vec<LoadIssue>,
    /// Requests that failed outright (only non-empty under `FetchPolicy::Partial`)
    pub failed: Vec<LoadIssue>,
}

impl LoadOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Turn a raw document into a record, or explain why it cannot be drawn.
pub fn validate(requested_id: &str, raw: RawProjectEntry) -> Result<ProjectRecord, RecordError> {
    let budget = check_number("budget", raw.budget)?;
    let expenditure = check_number("expenditure", raw.expenditure)?;
    if budget < 0.0 {
        return Err(RecordError::NegativeBudget(budget));
    }
    if expenditure < 0.0 {
        return Err(RecordError::NegativeExpenditure(expenditure));
    }

    let id = match raw.project_id {
        Some(id) if !id.trim().is_empty() => {
            if id != requested_id {
                tracing::debug!("Requested project '{}' answered as '{}'", requested_id, id);
            }
            id
        }
        _ => CompactString::new(requested_id),
    };

    let title = match raw.project_title {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            tracing::warn!("Project '{}' has no title, using its identifier", id);
            id.to_string()
        }
    };

    Ok(ProjectRecord {
        id,
        title,
        budget,
        expenditure,
    })
}

fn check_number(field: &'static str, value: Option<f64>) -> Result<f64, RecordError> {
    match value {
        None => Err(RecordError::Missing(field)),
        Some(v) if !v.is_finite() => Err(RecordError::NotFinite { field, value: v }),
        Some(v) => Ok(v),
    }
}

/// Upper bound on requests in flight for one batch.
pub const MAX_CONCURRENT_REQUESTS: usize = 32;

/// Number of fetch threads for a batch of `len` identifiers.
fn request_threads(len: usize) -> usize {
    len.clamp(1, MAX_CONCURRENT_REQUESTS)
}

fn request_pool(len: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(request_threads(len))
        .thread_name(|i| format!("fetch-{i}"))
        .build()
}

/// Fetch every identifier concurrently and join the batch.
///
/// Results keep the order of `ids`. Invalid documents are skipped with a
/// warning. Failed requests abort the batch under
/// [`FetchPolicy::AllOrNothing`] and are collected under
/// [`FetchPolicy::Partial`].
pub fn load_projects<S: ProjectSource>(
    source: &S,
    ids: &[CompactString],
    policy: FetchPolicy,
    progress: Option<&mpsc::Sender<LoadProgress>>,
) -> LoadResult<LoadOutcome> {
    let started = Instant::now();
    let notify = |p: LoadProgress| {
        if let Some(tx) = progress {
            let _ = tx.send(p);
        }
    };
    notify(LoadProgress::Started { total: ids.len() });
    tracing::info!("Fetching {} project records", ids.len());

    let fetch_all = || -> Vec<LoadResult<ProjectRecord>> {
        ids.par_iter()
            // One identifier per job so a slow request never holds back another
            .with_max_len(1)
            .map(|id| {
                let result = source.fetch(id).and_then(|raw| {
                    validate(id, raw).map_err(|source| LoadError::Invalid {
                        id: id.clone(),
                        source,
                    })
                });
                match &result {
                    Ok(record) => {
                        tracing::debug!(
                            "Loaded '{}' (budget={}, expenditure={})",
                            record.id,
                            record.budget,
                            record.expenditure
                        );
                        notify(LoadProgress::Fetched { id: id.clone() });
                    }
                    Err(e) => notify(LoadProgress::Failed {
                        id: id.clone(),
                        message: e.to_string(),
                    }),
                }
                result
            })
            .collect()
    };

    // Requests block on I/O, so size the pool to the batch rather than the CPU count.
    let results = match request_pool(ids.len()) {
        Ok(pool) => pool.install(fetch_all),
        Err(e) => {
            tracing::warn!("Could not start fetch pool ({}), using the global pool", e);
            fetch_all()
        }
    };

    let mut outcome = LoadOutcome::default();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(error @ LoadError::Invalid { .. }) => {
                tracing::warn!("Skipping project: {}", error);
                outcome.skipped.push(LoadIssue {
                    id: id.clone(),
                    error,
                });
            }
            Err(error) => {
                tracing::error!("{}", error);
                outcome.failed.push(LoadIssue {
                    id: id.clone(),
                    error,
                });
            }
        }
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    notify(LoadProgress::Completed {
        loaded: outcome.records.len(),
        failed: outcome.failed.len() + outcome.skipped.len(),
        elapsed_ms,
    });

    if policy == FetchPolicy::AllOrNothing && !outcome.failed.is_empty() {
        let failed = outcome.failed.len();
        let first = outcome.failed.swap_remove(0).error;
        return Err(LoadError::Batch {
            failed,
            total: ids.len(),
            first: Box::new(first),
        });
    }

    tracing::info!(
        "Batch joined in {} ms: {} loaded, {} skipped, {} failed",
        elapsed_ms,
        outcome.records.len(),
        outcome.skipped.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}
