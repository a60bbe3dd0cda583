//! Content document model.

use serde::{Deserialize, Serialize};

/// A content item as received from the publishing pipeline.
///
/// Fields missing from the JSON payload are empty, never "unset": an
/// absent `title` and an empty `title` mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub published_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub story_package: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_package: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub editorial_desk: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publication: Vec<String>,
}

impl ContentDocument {
    /// Create a document with only its identifier set.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Default::default()
        }
    }
}
