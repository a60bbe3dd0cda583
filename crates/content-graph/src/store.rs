//! Graph store contract and its Neo4j implementation.
//!
//! Statements are plain Cypher text plus named parameters so they can be
//! inspected before they reach the driver.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use neo4rs::{BoltType, Query};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use content_core::content::PropertyValue;
use content_core::StoreError;

use crate::client::GraphClient;
use crate::schema::Constraint;

/// Result type for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Column a summarised write must return with its deleted node count.
pub const NODES_DELETED_COLUMN: &str = "nodesDeleted";

/// A Cypher parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    String(String),
    Int(i64),
    StringList(Vec<String>),
    Map(BTreeMap<String, Param>),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::String(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::String(value)
    }
}

impl From<PropertyValue> for Param {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::String(s) => Param::String(s),
            PropertyValue::Integer(i) => Param::Int(i),
            PropertyValue::StringList(list) => Param::StringList(list),
        }
    }
}

impl From<Param> for BoltType {
    fn from(value: Param) -> Self {
        match value {
            Param::String(s) => s.into(),
            Param::Int(i) => i.into(),
            Param::StringList(list) => list.into(),
            Param::Map(map) => map
                .into_iter()
                .map(|(k, v)| (k, BoltType::from(v)))
                .collect::<HashMap<String, BoltType>>()
                .into(),
        }
    }
}

/// A parameterised Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub cypher: String,
    pub params: BTreeMap<String, Param>,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind a named parameter.
    pub fn param(mut self, key: &str, value: impl Into<Param>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

impl From<Statement> for Query {
    fn from(statement: Statement) -> Self {
        statement
            .params
            .into_iter()
            .fold(Query::new(statement.cypher), |query, (key, value)| {
                query.param(&key, BoltType::from(value))
            })
    }
}

/// Counters reported by a summarised write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub nodes_deleted: i64,
}

/// Transactional graph store used by the content service.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the given uniqueness constraints if they do not exist.
    async fn ensure_constraints(&self, constraints: &[Constraint]) -> StoreResult<()>;

    /// Run a read statement and decode each row into `T`.
    async fn read<T>(&self, statement: Statement) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Run write statements in a single transaction.
    async fn write(&self, statements: Vec<Statement>) -> StoreResult<()>;

    /// Run one write statement returning a `nodesDeleted` count column.
    async fn write_with_summary(&self, statement: Statement) -> StoreResult<WriteSummary>;

    /// Verify the store answers queries.
    async fn verify_connectivity(&self) -> StoreResult<()>;
}

fn query_error(e: neo4rs::Error) -> StoreError {
    StoreError::query(e.to_string())
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn ensure_constraints(&self, constraints: &[Constraint]) -> StoreResult<()> {
        info!("Ensuring Neo4j constraints...");

        for constraint in constraints {
            self.execute(Query::new(constraint.cypher())).await.map_err(query_error)?;
        }

        info!("Neo4j constraints ensured ({} statements)", constraints.len());
        Ok(())
    }

    async fn read<T>(&self, statement: Statement) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let rows = self.query(statement.into()).await.map_err(query_error)?;

        rows.iter()
            .map(|row| {
                row.to::<T>()
                    .map_err(|e| StoreError::deserialize(format!("{:?}", e)))
            })
            .collect()
    }

    async fn write(&self, statements: Vec<Statement>) -> StoreResult<()> {
        debug!(statements = statements.len(), "Running write transaction");
        let queries = statements.into_iter().map(Query::from).collect();
        self.execute_in_transaction(queries).await.map_err(query_error)
    }

    async fn write_with_summary(&self, statement: Statement) -> StoreResult<WriteSummary> {
        let rows = self.query(statement.into()).await.map_err(query_error)?;

        let nodes_deleted = match rows.first() {
            Some(row) => row.get::<i64>(NODES_DELETED_COLUMN).map_err(|e| {
                StoreError::deserialize(format!(
                    "Failed to get field '{}': {:?}",
                    NODES_DELETED_COLUMN, e
                ))
            })?,
            None => 0,
        };

        Ok(WriteSummary { nodes_deleted })
    }

    async fn verify_connectivity(&self) -> StoreResult<()> {
        self.execute(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| StoreError::connection(format!("Neo4j at {} is not responding: {}", self.uri(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_binds_params() {
        let stmt = Statement::new("MATCH (n {uuid: $uuid}) RETURN n")
            .param("uuid", "x")
            .param("tags", Param::StringList(vec!["a".to_string()]));

        assert_eq!(stmt.params.len(), 2);
        assert_eq!(stmt.params["uuid"], Param::String("x".to_string()));
    }

    #[test]
    fn test_param_from_property_value() {
        assert_eq!(Param::from(PropertyValue::Integer(3600)), Param::Int(3600));
        assert_eq!(
            Param::from(PropertyValue::String("t".to_string())),
            Param::String("t".to_string())
        );
    }
}
