//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::Deserialize;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub db: Option<String>,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            db: None,
            max_connections: 16,
            fetch_size: 1024,
        }
    }
}

/// Client for Neo4j operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    uri: String,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool, so a `RETURN 1` ping follows to
    /// fail fast when Neo4j is unreachable.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);

        if let Some(db) = &config.db {
            builder = builder.db(db.as_str());
        }

        let neo4j_config = builder.build().context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<(), neo4rs::Error> {
        self.graph.run(query).await
    }

    /// Execute several queries in one transaction, committed together.
    pub async fn execute_in_transaction(&self, queries: Vec<Query>) -> Result<(), neo4rs::Error> {
        let mut txn = self.graph.start_txn().await?;
        if let Err(e) = txn.run_queries(queries).await {
            let _ = txn.rollback().await;
            return Err(e);
        }
        txn.commit().await
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<Row>, neo4rs::Error> {
        let mut result = self.graph.execute(query).await?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// The URI this client was connected with.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient").field("uri", &self.uri).finish()
    }
}
