//! Web server command.

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::{info, warn};

use content_core::ContentRw;
use content_web::state::AppState;

use super::connect_service;
use crate::config::AppConfig;

pub async fn execute(config: &AppConfig) -> Result<()> {
    if config.opa_url.as_deref().unwrap_or_default().is_empty()
        || config.opa_special_content_policy_path.as_deref().unwrap_or_default().is_empty()
    {
        bail!("--opa-url and --opa-special-content-policy-path are required to serve writes");
    }

    let service = connect_service(config).await?;
    service.initialise().await?;

    let mut state = AppState::new(service, config.health_config());
    match std::fs::read(&config.api_yml) {
        Ok(doc) => state = state.with_api_yml(doc),
        Err(e) => warn!(path = %config.api_yml.display(), error = %e, "OpenAPI document not loaded, /__api disabled"),
    }

    println!();
    println!("  {} {}", config.app_name.cyan().bold(), "HTTP API".bold());
    println!();
    println!("  {}      http://0.0.0.0:{}/content/{{uuid}}", "Content".green(), config.port);
    println!("  {}       http://0.0.0.0:{}/__health", "Health".green(), config.port);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    info!(port = config.port, "Application started");
    content_web::run_server(state, config.port).await?;

    Ok(())
}
