//! Read/write service contract exposed to the HTTP layer.

use async_trait::async_trait;

use crate::content::model::ContentDocument;
use crate::error::ContentResult;

/// Operations the HTTP layer dispatches to.
///
/// `transaction_id` only correlates log lines; it never changes behaviour.
#[async_trait]
pub trait ContentRw: Send + Sync {
    /// Create any missing constraints in the store.
    async fn initialise(&self) -> ContentResult<()>;

    /// Upsert a content document. Documents that do not qualify are skipped
    /// and still reported as success.
    async fn write(&self, doc: &ContentDocument, transaction_id: &str) -> ContentResult<()>;

    /// Read a content document back. `None` when no content node exists.
    async fn read(&self, uuid: &str, transaction_id: &str) -> ContentResult<Option<ContentDocument>>;

    /// Delete a content node. Returns whether a node was removed.
    async fn delete(&self, uuid: &str, transaction_id: &str) -> ContentResult<bool>;

    /// Number of content nodes in the store.
    async fn count(&self) -> ContentResult<i64>;

    /// Verify the store is reachable.
    async fn check(&self) -> ContentResult<()>;
}
