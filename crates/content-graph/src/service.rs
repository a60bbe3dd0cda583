//! Content read/write service.
//!
//! Every write rebuilds the node's properties, labels and package
//! relationships from the incoming document, so repeated writes converge
//! on the last document regardless of what was stored before.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use content_core::content::{self, model::ContentDocument};
use content_core::policy::model::SpecialContentQuery;
use content_core::{ContentResult, ContentRw, PolicyAgent};

use crate::queries;
use crate::schema::CONTENT_CONSTRAINTS;
use crate::store::GraphStore;

/// Log event name for persisted writes.
const SAVE_EVENT: &str = "SaveNeo4j";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentRow {
    uuid: Option<String>,
    title: Option<String>,
    published_date: Option<String>,
    publication: Option<Vec<String>>,
    story_package: Option<String>,
    content_package: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    c: i64,
}

/// Writes content documents to a graph store.
pub struct ContentService<S, P> {
    store: S,
    agent: P,
}

impl<S: GraphStore, P: PolicyAgent> ContentService<S, P> {
    pub fn new(store: S, agent: P) -> Self {
        Self { store, agent }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: GraphStore, P: PolicyAgent> ContentRw for ContentService<S, P> {
    async fn initialise(&self) -> ContentResult<()> {
        self.store.ensure_constraints(CONTENT_CONSTRAINTS).await?;
        Ok(())
    }

    async fn write(&self, doc: &ContentDocument, transaction_id: &str) -> ContentResult<()> {
        if !content::is_persistable(doc) {
            debug!(
                transaction_id,
                uuid = %doc.uuid,
                content_type = %doc.content_type,
                "Skipping content without a body"
            );
            return Ok(());
        }

        let query = SpecialContentQuery {
            editorial_desk: doc.editorial_desk.clone(),
        };
        let decision = self.agent.check_special_content_policy(&query).await?;
        if decision.result.is_special_content {
            info!(
                transaction_id,
                uuid = %doc.uuid,
                decision_id = %decision.decision_id,
                "Content was marked as special content, it will not be persisted"
            );
            return Ok(());
        }

        let props = content::content_properties(doc)?;
        let labels = content::content_labels(doc);
        let stale = content::superseded_labels(&labels);

        let mut statements = vec![queries::delete_content_relationships(&doc.uuid)];
        if !doc.story_package.is_empty() {
            statements.push(queries::add_story_package_relation(&doc.uuid, &doc.story_package));
        }
        if !doc.content_package.is_empty() {
            statements.push(queries::add_content_package_relation(&doc.uuid, &doc.content_package));
        }
        statements.push(queries::write_content_node(&doc.uuid, props, &labels, &stale));

        match self.store.write(statements).await {
            Ok(()) => {
                info!(
                    event = SAVE_EVENT,
                    transaction_id,
                    uuid = %doc.uuid,
                    content_type = %doc.content_type,
                    "Content written to Neo4j"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    event = SAVE_EVENT,
                    transaction_id,
                    uuid = %doc.uuid,
                    content_type = %doc.content_type,
                    error = %e,
                    "Failed to write content to Neo4j"
                );
                Err(e.into())
            }
        }
    }

    async fn read(&self, uuid: &str, transaction_id: &str) -> ContentResult<Option<ContentDocument>> {
        let rows: Vec<ContentRow> = self.store.read(queries::read_content(uuid)).await?;

        // OPTIONAL MATCH yields one all-null row when the node is missing.
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        let found_uuid = row.uuid.unwrap_or_default();
        if found_uuid.is_empty() {
            debug!(transaction_id, uuid, "Content not found");
            return Ok(None);
        }

        Ok(Some(ContentDocument {
            uuid: found_uuid,
            title: row.title.unwrap_or_default(),
            published_date: row.published_date.unwrap_or_default(),
            publication: row.publication.unwrap_or_default(),
            story_package: row.story_package.unwrap_or_default(),
            content_package: row.content_package.unwrap_or_default(),
            ..Default::default()
        }))
    }

    async fn delete(&self, uuid: &str, transaction_id: &str) -> ContentResult<bool> {
        // Separate calls: the cleanup can only find its targets while the
        // package node still exists, and a batch does not guarantee order.
        self.store.write(vec![queries::clear_collection_nodes(uuid)]).await?;

        let summary = self.store.write_with_summary(queries::remove_content_node(uuid)).await?;
        let deleted = summary.nodes_deleted > 0;

        info!(transaction_id, uuid, deleted, "Content delete processed");
        Ok(deleted)
    }

    async fn count(&self) -> ContentResult<i64> {
        let rows: Vec<CountRow> = self.store.read(queries::count_content()).await?;
        Ok(rows.first().map(|row| row.c).unwrap_or(0))
    }

    async fn check(&self) -> ContentResult<()> {
        self.store.verify_connectivity().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};

    use content_core::policy::model::{Decision, SpecialContentDecision};
    use content_core::{ContentError, PolicyError, StoreError};

    use super::*;
    use crate::schema::Constraint;
    use crate::store::{Param, Statement, StoreResult, WriteSummary};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Constraints(usize),
        Read(Statement),
        Write(Vec<Statement>),
        WriteWithSummary(Statement),
        Ping,
    }

    /// Records every call and replays canned rows.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<Call>>,
        rows: Mutex<VecDeque<Vec<Value>>>,
        nodes_deleted: i64,
        fail_writes: bool,
    }

    impl RecordingStore {
        fn with_rows(rows: Vec<Value>) -> Self {
            let store = Self::default();
            store.rows.lock().unwrap().push_back(rows);
            store
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn written(&self) -> Vec<Statement> {
            self.calls()
                .into_iter()
                .flat_map(|call| match call {
                    Call::Write(stmts) => stmts,
                    _ => Vec::new(),
                })
                .collect()
        }
    }

    #[async_trait]
    impl GraphStore for RecordingStore {
        async fn ensure_constraints(&self, constraints: &[Constraint]) -> StoreResult<()> {
            self.calls.lock().unwrap().push(Call::Constraints(constraints.len()));
            Ok(())
        }

        async fn read<T>(&self, statement: Statement) -> StoreResult<Vec<T>>
        where
            T: DeserializeOwned + Send + 'static,
        {
            self.calls.lock().unwrap().push(Call::Read(statement));
            let rows = self.rows.lock().unwrap().pop_front().unwrap_or_default();
            rows.into_iter()
                .map(|row| serde_json::from_value(row).map_err(|e| StoreError::deserialize(e.to_string())))
                .collect()
        }

        async fn write(&self, statements: Vec<Statement>) -> StoreResult<()> {
            self.calls.lock().unwrap().push(Call::Write(statements));
            if self.fail_writes {
                return Err(StoreError::query("Neo.ClientError.Schema.ConstraintValidationFailed"));
            }
            Ok(())
        }

        async fn write_with_summary(&self, statement: Statement) -> StoreResult<WriteSummary> {
            self.calls.lock().unwrap().push(Call::WriteWithSummary(statement));
            Ok(WriteSummary {
                nodes_deleted: self.nodes_deleted,
            })
        }

        async fn verify_connectivity(&self) -> StoreResult<()> {
            self.calls.lock().unwrap().push(Call::Ping);
            Ok(())
        }
    }

    /// Answers every policy query the same way.
    struct FixedPolicy {
        special: bool,
        fail: bool,
        queries: Mutex<Vec<SpecialContentQuery>>,
    }

    impl FixedPolicy {
        fn allow() -> Self {
            Self {
                special: false,
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn special() -> Self {
            Self {
                special: true,
                ..Self::allow()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::allow()
            }
        }
    }

    #[async_trait]
    impl PolicyAgent for FixedPolicy {
        async fn check_special_content_policy(
            &self,
            query: &SpecialContentQuery,
        ) -> Result<Decision<SpecialContentDecision>, PolicyError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(PolicyError::Request("connection refused".to_string()));
            }
            Ok(Decision {
                decision_id: "TEST_UUID".to_string(),
                result: SpecialContentDecision {
                    is_special_content: self.special,
                },
            })
        }
    }

    fn article(uuid: &str) -> ContentDocument {
        ContentDocument {
            uuid: uuid.to_string(),
            title: "Content Title".to_string(),
            published_date: "1970-01-01T01:00:00.000Z".to_string(),
            body: "Some body".to_string(),
            ..Default::default()
        }
    }

    fn all_props(stmt: &Statement) -> &std::collections::BTreeMap<String, Param> {
        match &stmt.params["allprops"] {
            Param::Map(map) => map,
            other => panic!("expected allprops map, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_without_body_is_skipped() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let doc = ContentDocument {
            uuid: "y".to_string(),
            title: "t".to_string(),
            ..Default::default()
        };

        service.write(&doc, "tid_test").await.unwrap();

        assert!(service.store().calls().is_empty());
        assert!(service.agent.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_bodyless_video_is_persisted() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let doc = ContentDocument {
            uuid: "z".to_string(),
            content_type: "Video".to_string(),
            ..Default::default()
        };

        service.write(&doc, "tid_test").await.unwrap();

        let written = service.store().written();
        assert_eq!(written.len(), 2);
        assert!(written[1].cypher.contains("SET n:`Content`:`Video`"));
    }

    #[tokio::test]
    async fn test_write_special_content_is_suppressed() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::special());
        let mut doc = article("x");
        doc.editorial_desk = "/FT/Professional/Central Banking".to_string();

        service.write(&doc, "tid_test").await.unwrap();

        assert!(service.store().calls().is_empty());
        let queries = service.agent.queries.lock().unwrap();
        assert_eq!(queries[0].editorial_desk, "/FT/Professional/Central Banking");
    }

    #[tokio::test]
    async fn test_write_policy_failure_aborts() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::failing());

        let err = service.write(&article("x"), "tid_test").await.unwrap_err();

        assert!(matches!(err, ContentError::Policy(_)));
        assert!(service.store().calls().is_empty());
    }

    #[tokio::test]
    async fn test_write_invalid_published_date_aborts() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let mut doc = article("x");
        doc.published_date = "yesterday".to_string();

        let err = service.write(&doc, "tid_test").await.unwrap_err();

        assert!(err.is_validation());
        assert!(service.store().calls().is_empty());
    }

    #[tokio::test]
    async fn test_write_statement_sequence() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let mut doc = article("x");
        doc.story_package = "sp".to_string();
        doc.content_package = "cp".to_string();

        service.write(&doc, "tid_test").await.unwrap();

        let calls = service.store().calls();
        assert_eq!(calls.len(), 1, "all statements go in one transaction");

        let written = service.store().written();
        assert_eq!(written.len(), 4);
        assert!(written[0].cypher.contains("DELETE rel1, rel2"));
        assert!(written[1].cypher.contains("IS_CURATED_FOR"));
        assert_eq!(written[1].params["packageUuid"], Param::String("sp".to_string()));
        assert!(written[2].cypher.contains("CONTAINS"));
        assert_eq!(written[2].params["packageUuid"], Param::String("cp".to_string()));
        assert!(written[3].cypher.contains("SET n = $allprops"));
    }

    #[tokio::test]
    async fn test_write_properties_and_epoch() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());

        service.write(&article("x"), "tid_test").await.unwrap();

        let written = service.store().written();
        let props = all_props(written.last().unwrap());
        assert_eq!(props["uuid"], Param::String("x".to_string()));
        assert_eq!(props["title"], Param::String("Content Title".to_string()));
        assert_eq!(props["prefLabel"], Param::String("Content Title".to_string()));
        assert_eq!(props["publishedDateEpoch"], Param::Int(3600));
    }

    #[tokio::test]
    async fn test_update_without_optional_fields_drops_properties() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let update = ContentDocument {
            uuid: "x".to_string(),
            body: "b2".to_string(),
            ..Default::default()
        };

        service.write(&article("x"), "tid_1").await.unwrap();
        service.write(&update, "tid_2").await.unwrap();

        let written = service.store().written();
        let props = all_props(written.last().unwrap());
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("uuid"));
        // Relationships are always cleared before the node is rewritten.
        assert!(written[2].cypher.contains("DELETE rel1, rel2"));
        assert_eq!(written.len(), 4);
    }

    #[tokio::test]
    async fn test_write_live_blog_package_labels() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let doc = ContentDocument {
            uuid: "lb".to_string(),
            content_type: "LiveBlogPackage".to_string(),
            content_package: "cp".to_string(),
            ..Default::default()
        };

        service.write(&doc, "tid_test").await.unwrap();

        let written = service.store().written();
        let node = written.last().unwrap();
        assert!(node.cypher.contains("MERGE (n:Thing {uuid: $uuid})"));
        assert!(node.cypher.contains("SET n:`Content`:`ContentPackage`:`LiveBlogPackage`"));
    }

    #[tokio::test]
    async fn test_rewrite_as_article_removes_package_labels() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        let package = ContentDocument {
            uuid: "lb".to_string(),
            content_type: "LiveBlogPackage".to_string(),
            content_package: "cp".to_string(),
            ..Default::default()
        };
        let article = ContentDocument {
            uuid: "lb".to_string(),
            content_type: "Article".to_string(),
            body: "b".to_string(),
            ..Default::default()
        };

        service.write(&package, "tid_1").await.unwrap();
        service.write(&article, "tid_2").await.unwrap();

        let written = service.store().written();
        let node = written.last().unwrap();
        assert!(node.cypher.contains("REMOVE n:"));
        assert!(node.cypher.contains("`ContentPackage`"));
        assert!(node.cypher.contains("`LiveBlogPackage`"));
        assert!(node.cypher.contains("SET n:`Content`:`Article`"));
        let remove_clause = node.cypher.lines().find(|l| l.contains("REMOVE")).unwrap();
        assert!(!remove_clause.contains("`Article`"));
        assert!(!remove_clause.contains("`Content`"));
    }

    #[tokio::test]
    async fn test_write_store_error_propagates() {
        let store = RecordingStore {
            fail_writes: true,
            ..Default::default()
        };
        let service = ContentService::new(store, FixedPolicy::allow());

        let err = service.write(&article("x"), "tid_test").await.unwrap_err();
        assert!(matches!(err, ContentError::Store(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn test_read_found() {
        let store = RecordingStore::with_rows(vec![json!({
            "uuid": "x",
            "title": "Content Title",
            "publishedDate": "1970-01-01T01:00:00.000Z",
            "publication": ["8e6c705e-1132-42a2-8db0-c295e29e8658"],
            "storyPackage": "sp",
            "contentPackage": null
        })]);
        let service = ContentService::new(store, FixedPolicy::allow());

        let doc = service.read("x", "tid_test").await.unwrap().unwrap();

        assert_eq!(doc.uuid, "x");
        assert_eq!(doc.title, "Content Title");
        assert_eq!(doc.published_date, "1970-01-01T01:00:00.000Z");
        assert_eq!(doc.publication, vec!["8e6c705e-1132-42a2-8db0-c295e29e8658"]);
        assert_eq!(doc.story_package, "sp");
        assert!(doc.content_package.is_empty());
        assert!(doc.body.is_empty());
    }

    #[tokio::test]
    async fn test_read_all_null_row_is_not_found() {
        let store = RecordingStore::with_rows(vec![json!({
            "uuid": null, "title": null, "publishedDate": null,
            "publication": null, "storyPackage": null, "contentPackage": null
        })]);
        let service = ContentService::new(store, FixedPolicy::allow());

        assert!(service.read("missing", "tid_test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_no_rows_is_not_found() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        assert!(service.read("missing", "tid_test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_runs_cleanup_before_removal() {
        let store = RecordingStore {
            nodes_deleted: 1,
            ..Default::default()
        };
        let service = ContentService::new(store, FixedPolicy::allow());

        assert!(service.delete("x", "tid_test").await.unwrap());

        let calls = service.store().calls();
        assert_eq!(calls.len(), 2);
        match (&calls[0], &calls[1]) {
            (Call::Write(cleanup), Call::WriteWithSummary(remove)) => {
                assert_eq!(cleanup.len(), 1);
                assert!(cleanup[0].cypher.contains("NOT cc:ContentCollection"));
                assert!(remove.cypher.contains("DETACH DELETE p"));
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_nothing_removed() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        assert!(!service.delete("missing", "tid_test").await.unwrap());
    }

    #[tokio::test]
    async fn test_count() {
        let store = RecordingStore::with_rows(vec![json!({"c": 3})]);
        let service = ContentService::new(store, FixedPolicy::allow());
        assert_eq!(service.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_no_rows_is_zero() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initialise_and_check() {
        let service = ContentService::new(RecordingStore::default(), FixedPolicy::allow());

        service.initialise().await.unwrap();
        service.check().await.unwrap();

        assert_eq!(service.store().calls(), vec![Call::Constraints(1), Call::Ping]);
    }
}
