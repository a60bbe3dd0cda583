//! Health, good-to-go and API document handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

/// Result of one health check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: String,
}

/// Health report for the whole service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub system_code: String,
    pub name: String,
    pub description: String,
    pub checks: Vec<CheckResult>,
    pub ok: bool,
}

/// Run the Neo4j connectivity check, bounded by the configured timeout.
async fn neo4j_check(state: &AppState) -> CheckResult {
    let health = &state.health;

    let output = match tokio::time::timeout(health.timeout, state.service.check()).await {
        Ok(Ok(())) => Ok(String::new()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("Check timed out after {:?}", health.timeout)),
    };

    CheckResult {
        id: "check-connectivity-to-neo4j".to_string(),
        name: "Check connectivity to Neo4j".to_string(),
        ok: output.is_ok(),
        severity: 1,
        business_impact: "Cannot read/write content via this writer".to_string(),
        technical_summary: health.technical_summary.clone(),
        panic_guide: health.panic_guide.clone(),
        check_output: output.unwrap_or_else(|e| e),
        last_updated: chrono::Utc::now().to_rfc3339(),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let checks = vec![neo4j_check(&state).await];
    let ok = checks.iter().all(|c| c.ok);

    Json(HealthReport {
        schema_version: 1,
        system_code: state.health.system_code.clone(),
        name: state.health.name.clone(),
        description: state.health.description.clone(),
        checks,
        ok,
    })
}

pub async fn good_to_go(State(state): State<AppState>) -> Response {
    let check = neo4j_check(&state).await;
    if check.ok {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, check.check_output).into_response()
    }
}

pub async fn api_document(State(state): State<AppState>) -> Response {
    match state.api_yml {
        Some(doc) => ([(header::CONTENT_TYPE, "text/vnd.yaml")], doc.to_vec()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
