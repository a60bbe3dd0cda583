//! Policy decision models.

use serde::{Deserialize, Serialize};

/// Input for the special content policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialContentQuery {
    pub editorial_desk: String,
}

/// A decision returned by the policy agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision<T> {
    pub decision_id: String,
    pub result: T,
}

/// Result of the special content policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialContentDecision {
    pub is_special_content: bool,
}
