//! content-rw-neo4j
//!
//! Writes a bare-bones representation of content to Neo4j and serves it
//! back over HTTP.

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::Cli;
use config::LogArgs;

/// Initialize tracing, optionally mirroring output to a log file.
///
/// `RUST_LOG` wins over the command line levels. The returned guard must be
/// held until exit so buffered file output is flushed.
fn init_tracing(args: &LogArgs) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},neo4rs={}", args.log_level, args.db_driver_log_level))
    });

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path.file_name().map(|f| f.to_os_string()).unwrap_or_else(|| "content-rw-neo4j.log".into());
            let appender = tracing_appender::rolling::never(dir.unwrap_or_else(|| std::path::Path::new(".")), file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli.config.log);

    cli.execute().await
}
