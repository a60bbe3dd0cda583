//! CLI command definitions and handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use content_graph::{ContentService, GraphClient};
use content_policy::OpaAgent;

use crate::config::AppConfig;

pub mod graph;
pub mod serve;

/// A RESTful API for managing content (bare-bones representation as full
/// content is served elsewhere) in Neo4j
#[derive(Parser)]
#[command(name = "content-rw-neo4j")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ensure constraints and serve the HTTP API (default)
    Serve,

    /// Ensure Neo4j constraints exist
    Init,

    /// Print the number of content nodes
    Count,

    /// Check Neo4j connectivity
    Status,
}

/// Content service backed by Neo4j and the policy agent.
pub type Service = ContentService<GraphClient, OpaAgent>;

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.config;

        info!(
            app_name = %config.app_name,
            app_system_code = %config.app_system_code,
            neo_url = %config.neo_url,
            port = config.port,
            batch_size = config.batch_size,
            "Application starting..."
        );

        match self.command.unwrap_or(Commands::Serve) {
            Commands::Serve => serve::execute(&config).await,
            Commands::Init => graph::cmd_init(&config).await,
            Commands::Count => graph::cmd_count(&config).await,
            Commands::Status => graph::cmd_status(&config).await,
        }
    }
}

/// Connect to Neo4j and wire up the content service.
///
/// The policy agent is only consulted on writes; commands that never write
/// may run without it configured.
pub async fn connect_service(config: &AppConfig) -> Result<Arc<Service>> {
    let client = GraphClient::connect(&config.graph_config())
        .await
        .with_context(|| format!("Could not connect to Neo4j at {}", config.neo_url))?;

    let agent = OpaAgent::for_special_content(
        config.opa_url.as_deref().unwrap_or_default(),
        config.opa_special_content_policy_path.as_deref().unwrap_or_default(),
    );

    Ok(Arc::new(ContentService::new(client, agent)))
}
