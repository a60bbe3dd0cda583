//! Content route handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use content_core::{ContentDocument, ContentError};

use super::{transaction_id, REQUEST_ID_HEADER};
use crate::state::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn message(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(json!({ "message": msg.into() })))
}

/// Validation problems are the caller's fault; everything else means a
/// collaborator is unavailable.
fn content_error(e: ContentError, tid: &str, uuid: &str) -> ApiError {
    if e.is_validation() {
        return message(StatusCode::BAD_REQUEST, e.to_string());
    }
    error!(transaction_id = tid, uuid, error = %e, "Content request failed");
    message(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
}

pub async fn write_content(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let tid = transaction_id(&headers);

    let doc: ContentDocument = serde_json::from_slice(&body)
        .map_err(|e| message(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)))?;

    if doc.uuid != uuid {
        return Err(message(
            StatusCode::BAD_REQUEST,
            format!("Uuids from payload and request, respectively, do not match: '{}' '{}'", doc.uuid, uuid),
        ));
    }

    state
        .service
        .write(&doc, &tid)
        .await
        .map_err(|e| content_error(e, &tid, &uuid))?;

    Ok(([(REQUEST_ID_HEADER, tid)], Json(json!({}))).into_response())
}

pub async fn read_content(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tid = transaction_id(&headers);

    let doc = state
        .service
        .read(&uuid, &tid)
        .await
        .map_err(|e| content_error(e, &tid, &uuid))?
        .ok_or_else(|| message(StatusCode::NOT_FOUND, "Content not found."))?;

    Ok(([(REQUEST_ID_HEADER, tid)], Json(doc)).into_response())
}

pub async fn delete_content(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tid = transaction_id(&headers);

    let deleted = state
        .service
        .delete(&uuid, &tid)
        .await
        .map_err(|e| content_error(e, &tid, &uuid))?;

    if !deleted {
        return Err(message(StatusCode::NOT_FOUND, "Content not found."));
    }

    Ok((StatusCode::NO_CONTENT, [(REQUEST_ID_HEADER, tid)]).into_response())
}

pub async fn count_content(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    let count = state
        .service
        .count()
        .await
        .map_err(|e| message(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    Ok(Json(count))
}
