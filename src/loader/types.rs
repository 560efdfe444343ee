use compact_str::CompactString;
use serde::{Deserialize, Deserializer};

/// Raw project document as served by the projects API, before validation.
/// Only the fields the report needs are decoded; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProjectEntry {
    #[serde(default)]
    pub project_id: Option<CompactString>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub expenditure: Option<f64>,
}

/// A validated project: finite, non-negative money values.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: CompactString,
    pub title: String,
    pub budget: f64,
    pub expenditure: f64,
}

impl ProjectRecord {
    pub fn new(id: &str, title: &str, budget: f64, expenditure: f64) -> Self {
        Self {
            id: CompactString::new(id),
            title: title.to_string(),
            budget,
            expenditure,
        }
    }

    /// Unclamped `expenditure / budget`. `None` when the budget is zero.
    pub fn spend_ratio(&self) -> Option<f64> {
        if self.budget > 0.0 {
            Some(self.expenditure / self.budget)
        } else {
            None
        }
    }
}

/// Progress of the batched fetch, reported per identifier.
#[derive(Debug, Clone)]
pub enum LoadProgress {
    /// Batch started for this many identifiers
    Started { total: usize },
    /// One record arrived and passed validation
    Fetched { id: CompactString },
    /// One identifier failed (network, status, decode or validation)
    Failed { id: CompactString, message: String },
    /// Batch joined
    Completed {
        loaded: usize,
        failed: usize,
        elapsed_ms: u64,
    },
}

/// The API is inconsistent about numbers: most documents carry JSON numbers,
/// some older ones carry numeric strings, and null means "not reported".
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
