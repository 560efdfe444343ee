use std::time::Duration;

use compact_str::CompactString;

use super::types::RawProjectEntry;
use super::{LoadError, LoadResult, ProjectSource};

/// Placeholder substituted with the project identifier in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Project documents served over HTTP, one GET per identifier.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    endpoint_template: String,
}

impl HttpSource {
    pub fn new(endpoint_template: &str, timeout: Duration) -> LoadResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()
            .map_err(LoadError::Client)?;

        Ok(Self::with_client(client, endpoint_template))
    }

    /// Use an already configured client (proxy, TLS or timeout settings).
    pub fn with_client(client: reqwest::blocking::Client, endpoint_template: &str) -> Self {
        Self {
            client,
            endpoint_template: endpoint_template.to_string(),
        }
    }

    pub fn endpoint_for(&self, id: &str) -> String {
        expand_template(&self.endpoint_template, id)
    }
}

impl ProjectSource for HttpSource {
    fn fetch(&self, id: &str) -> LoadResult<RawProjectEntry> {
        let url = self.endpoint_for(id);
        tracing::debug!("GET {}", url);

        let http_err = |source| LoadError::Http {
            id: CompactString::new(id),
            source,
        };

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                id: CompactString::new(id),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(http_err)?;
        serde_json::from_str(&body).map_err(|source| LoadError::Decode {
            id: CompactString::new(id),
            source,
        })
    }
}

/// Substitute a (percent-encoded) identifier into a URL template.
pub fn expand_template(template: &str, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    template.replace(ID_PLACEHOLDER, &encoded)
}
