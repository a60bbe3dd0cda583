//! Route handlers.

pub mod content;
pub mod health;

use axum::http::{HeaderMap, HeaderName};

/// Header carrying the transaction id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Transaction id from `X-Request-Id`, or a freshly generated one.
pub fn transaction_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("tid_{}", uuid::Uuid::new_v4().simple()))
}

#[cfg(test)]
mod test_support;
