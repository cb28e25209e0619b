//! Remote issue counting against the Jira search endpoint.
//!
//! The trait seam exists so aggregation logic can be exercised without a live
//! server, mirroring how the rest of the crate injects its collaborators.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::errors::GatherError;

const SEARCH_PATH: &str = "/rest/api/2/search";

/// Executes one classification query against one server and returns the
/// matching issue count.
#[async_trait]
pub trait JqlCounter: Send + Sync {
    async fn count(&self, server: &str, jql: &str) -> Result<u64, GatherError>;
}

/// Everything in the search response except `total` is ignored; pagination
/// is out of scope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    total: u64,
}

/// HTTP implementation: basic-auth GET with the query carried in the `jql`
/// parameter. No retries; a failure aborts the current window only.
#[derive(Debug, Clone)]
pub struct HttpJqlCounter {
    client: reqwest::Client,
    username: String,
    password: String,
}

impl HttpJqlCounter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatherError::configuration(format!("http client: {err}")))?;
        Ok(Self {
            client,
            username: username.into(),
            password: password.into(),
        })
    }
}

#[async_trait]
impl JqlCounter for HttpJqlCounter {
    async fn count(&self, server: &str, jql: &str) -> Result<u64, GatherError> {
        let url = format!("{server}{SEARCH_PATH}");
        debug!(server, jql, "running search query");

        let response = self
            .client
            .get(&url)
            .query(&[("jql", jql)])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|err| GatherError::from_http(server, err))?
            .error_for_status()
            .map_err(|err| GatherError::from_http(server, err))?;

        // A misspelled or missing `total` key must surface as a decode
        // error, never a silent zero.
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| GatherError::from_http(server, err))?;

        Ok(body.total)
    }
}
