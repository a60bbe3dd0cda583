//! In-memory `ContentRw` for route tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use content_core::content::content_properties;
use content_core::{ContentDocument, ContentResult, ContentRw, StoreError};

#[derive(Default)]
pub struct StubService {
    docs: Mutex<HashMap<String, ContentDocument>>,
    transaction_ids: Mutex<Vec<String>>,
    unavailable: bool,
    check_delay: Option<Duration>,
}

impl StubService {
    /// Every store call fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// Connectivity checks take `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            check_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn last_transaction_id(&self) -> Option<String> {
        self.transaction_ids.lock().unwrap().last().cloned()
    }

    fn ensure_available(&self) -> ContentResult<()> {
        if self.unavailable {
            return Err(StoreError::connection("Neo4j is not responding").into());
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRw for StubService {
    async fn initialise(&self) -> ContentResult<()> {
        self.ensure_available()
    }

    async fn write(&self, doc: &ContentDocument, transaction_id: &str) -> ContentResult<()> {
        content_properties(doc)?;
        self.ensure_available()?;
        self.transaction_ids.lock().unwrap().push(transaction_id.to_string());
        self.docs.lock().unwrap().insert(doc.uuid.clone(), doc.clone());
        Ok(())
    }

    async fn read(&self, uuid: &str, _transaction_id: &str) -> ContentResult<Option<ContentDocument>> {
        self.ensure_available()?;
        Ok(self.docs.lock().unwrap().get(uuid).map(|doc| ContentDocument {
            uuid: doc.uuid.clone(),
            title: doc.title.clone(),
            published_date: doc.published_date.clone(),
            publication: doc.publication.clone(),
            story_package: doc.story_package.clone(),
            content_package: doc.content_package.clone(),
            ..Default::default()
        }))
    }

    async fn delete(&self, uuid: &str, _transaction_id: &str) -> ContentResult<bool> {
        self.ensure_available()?;
        Ok(self.docs.lock().unwrap().remove(uuid).is_some())
    }

    async fn count(&self) -> ContentResult<i64> {
        self.ensure_available()?;
        Ok(self.docs.lock().unwrap().len() as i64)
    }

    async fn check(&self) -> ContentResult<()> {
        if let Some(delay) = self.check_delay {
            tokio::time::sleep(delay).await;
        }
        self.ensure_available()
    }
}
