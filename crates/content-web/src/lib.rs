//! Content Web Server
//!
//! Axum-based HTTP interface for reading, writing and deleting content,
//! plus the health endpoints.

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/content/__count", get(routes::content::count_content))
        .route(
            "/content/{uuid}",
            get(routes::content::read_content)
                .put(routes::content::write_content)
                .delete(routes::content::delete_content),
        )
        .route("/__health", get(routes::health::health))
        .route("/__gtg", get(routes::health::good_to_go));

    // No /__api endpoint without an OpenAPI document.
    if state.api_yml.is_some() {
        router = router.route("/__api", get(routes::health::api_document));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Web server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
