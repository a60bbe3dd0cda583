//! Neo4j maintenance commands.

use anyhow::Result;
use colored::Colorize;

use content_core::ContentRw;

use super::connect_service;
use crate::config::AppConfig;

/// Ensure constraints exist.
pub async fn cmd_init(config: &AppConfig) -> Result<()> {
    let service = connect_service(config).await?;
    service.initialise().await?;

    println!("{}", "Neo4j constraints ensured.".green().bold());
    Ok(())
}

/// Print the content node count.
pub async fn cmd_count(config: &AppConfig) -> Result<()> {
    let service = connect_service(config).await?;
    println!("{}", service.count().await?);
    Ok(())
}

/// Show connectivity and content count.
pub async fn cmd_status(config: &AppConfig) -> Result<()> {
    println!("{}", "Content Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Neo4j:   {}", config.neo_url.cyan());

    let service = connect_service(config).await?;
    match service.check().await {
        Ok(()) => println!("  Status:  {}", "reachable".green()),
        Err(e) => {
            println!("  Status:  {} ({})", "unreachable".red(), e);
            return Ok(());
        }
    }

    let count = service.count().await?;
    println!("  Content: {}", count.to_string().cyan());
    println!("{}", "─".repeat(40));

    Ok(())
}
