//! Policy agent contract.
//!
//! Content flagged as special by the policy agent is owned by another
//! writer and must not be persisted here.

pub mod model;

use async_trait::async_trait;
use thiserror::Error;

use model::{Decision, SpecialContentDecision, SpecialContentQuery};

/// Key of the special content policy in the agent path configuration.
pub const SPECIAL_CONTENT_KEY: &str = "SPECIAL_CONTENT";

/// Errors raised while asking the policy agent for a decision.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("key {key} missing from path config supplied to the policy agent client")]
    MissingPathConfig { key: String },

    #[error("failed to marshal a query for the policy engine: {0}")]
    QueryMarshal(String),

    #[error("failed to unmarshal a decision from the policy engine: {0}")]
    DecisionUnmarshal(String),

    #[error("there was a problem with the decision payload: {0}")]
    DecisionPayload(String),

    #[error("query request to the policy engine failed: {0}")]
    Request(String),

    #[error("failed to read a response from the policy engine: {0}")]
    ResponseRead(String),
}

/// Evaluates content policies.
#[async_trait]
pub trait PolicyAgent: Send + Sync {
    /// Decide whether the content described by `query` is special content.
    async fn check_special_content_policy(
        &self,
        query: &SpecialContentQuery,
    ) -> Result<Decision<SpecialContentDecision>, PolicyError>;
}
