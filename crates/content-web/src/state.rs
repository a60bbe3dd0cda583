//! Application state.

use std::sync::Arc;
use std::time::Duration;

use content_core::ContentRw;

/// Static description of the service's health check.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub system_code: String,
    pub name: String,
    pub description: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            system_code: "upp-content-rw-neo4j".to_string(),
            name: "ft-content_rw_neo4j ServiceModule".to_string(),
            description: "Writes 'content' to Neo4j, usually as part of a bulk upload done on a schedule".to_string(),
            technical_summary: "Cannot connect to Neo4j instance with something written to it".to_string(),
            panic_guide: "https://runbooks.in.ft.com/upp-content-rw-neo4j".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ContentRw>,
    pub health: Arc<HealthConfig>,
    pub api_yml: Option<Arc<Vec<u8>>>,
}

impl AppState {
    pub fn new(service: Arc<dyn ContentRw>, health: HealthConfig) -> Self {
        Self {
            service,
            health: Arc::new(health),
            api_yml: None,
        }
    }

    /// Serve `document` on `/__api`.
    pub fn with_api_yml(mut self, document: Vec<u8>) -> Self {
        self.api_yml = Some(Arc::new(document));
        self
    }
}
