//! `/api/assignments` — session homework, same shape as sessions.

#[cfg(test)]
#[path = "assignments_test.rs"]
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

/// `GET /api/assignments` — list, filters passed through verbatim.
pub async fn list_assignments(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Envelope {
    let mut req =
        UpstreamRequest::get("/api/assignments").bearer(bearer_token(&headers)).no_cache();
    if let Some(query) = query {
        req = req.query(query);
    }
    forward(&state, req).await.no_store()
}

/// `POST /api/assignments` — `title` required.
pub async fn create_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Envelope {
    create_record(&state, &headers, "/api/assignments", "title", body).await
}

/// `POST /api/assignments/{id}/files` — attach the handout or solution.
pub async fn upload_assignment_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Envelope {
    upload_record_files(&state, &headers, &format!("/api/assignments/{id}/files"), multipart)
        .await
}
