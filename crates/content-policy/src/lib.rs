//! # Content Policy
//!
//! HTTP client for an Open Policy Agent deployment.
//!
//! Queries are posted to `{url}/v1/data/{path}` wrapped as `{"input": ...}`,
//! where `path` is looked up by policy key in the configured path map.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::error::Category;
use tracing::{debug, warn};

use content_core::policy::model::{Decision, SpecialContentDecision, SpecialContentQuery};
use content_core::policy::{PolicyAgent, PolicyError, SPECIAL_CONTENT_KEY};

/// Prefix of the OPA data API.
const PATH_PREFIX: &str = "v1/data";

/// Default request timeout for policy queries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct PolicyQuery<'a, T> {
    input: &'a T,
}

/// Open Policy Agent client.
#[derive(Clone)]
pub struct OpaAgent {
    base_url: String,
    paths: HashMap<String, String>,
    client: reqwest::Client,
}

impl OpaAgent {
    /// Create a new agent for `base_url` with policy key to query path mapping.
    pub fn new(base_url: &str, paths: HashMap<String, String>) -> Self {
        Self::with_client(base_url, paths, build_client(DEFAULT_TIMEOUT))
    }

    /// Create an agent reusing an existing HTTP client.
    pub fn with_client(base_url: &str, paths: HashMap<String, String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            paths,
            client,
        }
    }

    /// Create an agent configured only for the special content policy.
    pub fn for_special_content(base_url: &str, policy_path: &str) -> Self {
        let paths = HashMap::from([(SPECIAL_CONTENT_KEY.to_string(), policy_path.to_string())]);
        Self::new(base_url, paths)
    }

    async fn query_policy_agent<T: Serialize + Sync>(&self, input: &T, path: &str) -> Result<Vec<u8>, PolicyError> {
        let body = serde_json::to_vec(&PolicyQuery { input })
            .map_err(|e| PolicyError::QueryMarshal(e.to_string()))?;

        let url = format!("{}/{}/{}", self.base_url, PATH_PREFIX, path.trim_start_matches('/'));
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PolicyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PolicyError::Request(format!("policy agent returned {}: {}", status, text)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PolicyError::ResponseRead(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// HTTP client with a request timeout, or the default client if the
/// builder fails.
fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build policy agent HTTP client, falling back to a client without timeout");
        reqwest::Client::default()
    })
}

#[async_trait]
impl PolicyAgent for OpaAgent {
    async fn check_special_content_policy(
        &self,
        query: &SpecialContentQuery,
    ) -> Result<Decision<SpecialContentDecision>, PolicyError> {
        let path = self
            .paths
            .get(SPECIAL_CONTENT_KEY)
            .ok_or_else(|| PolicyError::MissingPathConfig {
                key: SPECIAL_CONTENT_KEY.to_string(),
            })?;

        let raw = self.query_policy_agent(query, path).await?;
        let decision = parse_special_content_decision(&raw)?;

        debug!(
            decision_id = %decision.decision_id,
            is_special_content = decision.result.is_special_content,
            "Special content policy evaluated"
        );

        Ok(decision)
    }
}

/// Parse an agent response into a special content decision.
///
/// The payload must carry a string `decision_id` and a `result` object with
/// a boolean `is_special_content`. Bodies that are not JSON are
/// `DecisionUnmarshal`; JSON of the wrong shape is `DecisionPayload`.
pub fn parse_special_content_decision(raw: &[u8]) -> Result<Decision<SpecialContentDecision>, PolicyError> {
    serde_json::from_slice(raw).map_err(|e| match e.classify() {
        Category::Data => PolicyError::DecisionPayload(e.to_string()),
        Category::Io | Category::Syntax | Category::Eof => PolicyError::DecisionUnmarshal(e.to_string()),
    })
}
