//! Command line configuration. Every option can also be set from the
//! environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use content_graph::GraphConfig;
use content_web::state::HealthConfig;

#[derive(Args, Debug, Clone)]
pub struct AppConfig {
    /// Name of the application
    #[arg(long, env = "APP_NAME", default_value = "content-rw-neo4j", global = true)]
    pub app_name: String,

    /// System code of the application
    #[arg(long, env = "APP_SYSTEM_CODE", default_value = "upp-content-rw-neo4j", global = true)]
    pub app_system_code: String,

    /// Neo4j URL; must point to a leader node or use the neo4j:// scheme, otherwise writes will fail
    #[arg(long, env = "NEO_URL", default_value = "bolt://localhost:7687", global = true)]
    pub neo_url: String,

    /// Neo4j user
    #[arg(long, env = "NEO_USER", default_value = "neo4j", global = true)]
    pub neo_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    pub neo_password: String,

    /// Maximum number of pooled Neo4j connections
    #[arg(long, env = "NEO_MAX_CONNECTIONS", default_value = "16", global = true)]
    pub neo_max_connections: usize,

    /// Number of records fetched per round trip
    #[arg(long, env = "BATCH_SIZE", default_value = "1024", global = true)]
    pub batch_size: usize,

    /// Location of the OpenAPI YAML file
    #[arg(long, env = "API_YML", default_value = "./api.yml", global = true)]
    pub api_yml: PathBuf,

    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value = "8080", global = true)]
    pub port: u16,

    /// URL of the policy agent
    #[arg(long, env = "OPA_URL", global = true)]
    pub opa_url: Option<String>,

    /// Query path for the special content policy
    #[arg(long, env = "OPA_SPECIAL_CONTENT_POLICY_PATH", global = true)]
    pub opa_special_content_policy_path: Option<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log level of the Neo4j driver
    #[arg(long, env = "DB_DRIVER_LOG_LEVEL", default_value = "warn", global = true)]
    pub db_driver_log_level: String,

    /// Also write logs to this file
    #[arg(long, env = "LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.neo_url.clone(),
            user: self.neo_user.clone(),
            password: self.neo_password.clone(),
            db: None,
            max_connections: self.neo_max_connections,
            fetch_size: self.batch_size,
        }
    }

    pub fn health_config(&self) -> HealthConfig {
        HealthConfig {
            system_code: self.app_system_code.clone(),
            name: format!("{} ServiceModule", self.app_name),
            description: "Writes 'content' to Neo4j, usually as part of a bulk upload done on a schedule".to_string(),
            technical_summary: format!(
                "Cannot connect to Neo4j instance {} with something written to it",
                self.neo_url
            ),
            panic_guide: format!("https://runbooks.in.ft.com/{}", self.app_system_code),
            timeout: Duration::from_secs(10),
        }
    }
}
