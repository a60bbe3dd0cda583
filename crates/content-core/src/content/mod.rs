//! Projection of a content document onto a graph node.
//!
//! Decides whether a document is persisted at all, which labels the node
//! carries and which properties it holds. The graph layer turns the result
//! into statements.

pub mod model;

use std::collections::BTreeMap;

use chrono::DateTime;

use crate::error::{ContentError, ContentResult};
use model::ContentDocument;

/// Label carried by every node written by this service.
pub const CONTENT_LABEL: &str = "Content";

/// Label added when the document points at a content package.
pub const CONTENT_PACKAGE_LABEL: &str = "ContentPackage";

pub const LIVE_BLOG_PACKAGE: &str = "LiveBlogPackage";
pub const LIVE_BLOG_POST: &str = "LiveBlogPost";

/// Types that are persisted even without a body.
pub const BODYLESS_TYPES: &[&str] = &[
    "Content",
    "Article",
    "Video",
    "Graphic",
    "Audio",
    "ContentPackage",
    LIVE_BLOG_PACKAGE,
    LIVE_BLOG_POST,
    "LiveEvent",
];

/// Types never copied verbatim into the label set.
pub const GENERIC_LABEL_TYPES: &[&str] = &[CONTENT_LABEL, CONTENT_PACKAGE_LABEL, LIVE_BLOG_PACKAGE];

/// A single node property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    StringList(Vec<String>),
}

/// Full property set of a content node, written wholesale.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Whether the document qualifies for persistence.
///
/// Most content needs a body; media and structural types do not.
pub fn is_persistable(doc: &ContentDocument) -> bool {
    !doc.body.is_empty() || BODYLESS_TYPES.contains(&doc.content_type.as_str())
}

/// Labels the content node must carry, `Content` first.
pub fn content_labels(doc: &ContentDocument) -> Vec<String> {
    let mut labels = vec![CONTENT_LABEL.to_string()];

    if !doc.content_type.is_empty() && !GENERIC_LABEL_TYPES.contains(&doc.content_type.as_str()) {
        labels.push(doc.content_type.clone());
    }

    if !doc.content_package.is_empty() {
        labels.push(CONTENT_PACKAGE_LABEL.to_string());
        if doc.content_type == LIVE_BLOG_PACKAGE {
            labels.push(LIVE_BLOG_PACKAGE.to_string());
        }
    }

    labels
}

/// Labels this writer manages but `labels` no longer carries.
///
/// Only taxonomy labels are candidates; labels added by other writers are
/// never reported.
pub fn superseded_labels(labels: &[String]) -> Vec<String> {
    BODYLESS_TYPES
        .iter()
        .filter(|t| **t != CONTENT_LABEL)
        .filter(|t| !labels.iter().any(|l| l == *t))
        .map(|t| t.to_string())
        .collect()
}

/// Build the node property map from the non-empty document fields.
///
/// `publishedDate` must be RFC 3339; its Unix seconds are stored alongside
/// as `publishedDateEpoch`.
pub fn content_properties(doc: &ContentDocument) -> ContentResult<PropertyMap> {
    let mut props = PropertyMap::new();
    props.insert("uuid".to_string(), PropertyValue::String(doc.uuid.clone()));

    if !doc.title.is_empty() {
        props.insert("title".to_string(), PropertyValue::String(doc.title.clone()));
        props.insert("prefLabel".to_string(), PropertyValue::String(doc.title.clone()));
    }

    if !doc.published_date.is_empty() {
        let epoch = published_date_epoch(&doc.published_date)?;
        props.insert(
            "publishedDate".to_string(),
            PropertyValue::String(doc.published_date.clone()),
        );
        props.insert("publishedDateEpoch".to_string(), PropertyValue::Integer(epoch));
    }

    if !doc.publication.is_empty() {
        props.insert(
            "publication".to_string(),
            PropertyValue::StringList(doc.publication.clone()),
        );
    }

    Ok(props)
}

fn published_date_epoch(value: &str) -> ContentResult<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|source| ContentError::InvalidPublishedDate {
            value: value.to_string(),
            source,
        })
}
