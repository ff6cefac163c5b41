//! `/api/sessions` — weekly study session records.
//!
//! List replies may include member-only sessions, so any bearer the
//! browser sent rides along and the backend decides visibility.

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use axum::Json;
use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::HeaderMap;
use serde_json::Value;

use crate::backend::UpstreamRequest;
use crate::envelope::Envelope;
use crate::state::AppState;

use super::auth::bearer_token;
use super::uploads::upload_record_files;
use super::{create_record, forward};

/// `GET /api/sessions` — list, filters passed through verbatim.
pub async fn list_sessions(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Envelope {
    let mut req = UpstreamRequest::get("/api/sessions").bearer(bearer_token(&headers)).no_cache();
    if let Some(query) = query {
        req = req.query(query);
    }
    forward(&state, req).await.no_store()
}

/// `POST /api/sessions` — `title` required.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Envelope {
    create_record(&state, &headers, "/api/sessions", "title", body).await
}

/// `POST /api/sessions/{id}/files` — attach session material.
pub async fn upload_session_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Envelope {
    upload_record_files(&state, &headers, &format!("/api/sessions/{id}/files"), multipart).await
}
