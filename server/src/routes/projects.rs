//! `/api/projects` — the project archive: metadata, files, previews.
//!
//! DESIGN
//! ======
//! Projects are created in two upstream steps, metadata then files. The
//! `with-files` route runs both and deletes the fresh record when the
//! file leg fails, so the archive never lists a project missing its
//! thumbnail or slides. Presentation previews bypass the JSON envelope
//! entirely and stream the stored bytes back out.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::backend::{RawReply, UpstreamRequest};
use crate::envelope::Envelope;
use crate::state::AppState;

use super::auth::bearer_token;
use super::uploads::{collect_parts, create_then_attach, upload_record_files};
use super::{create_record, forward, has_text_field};

/// Multipart field carrying the project metadata JSON.
const METADATA_FIELD: &str = "project";

/// `GET /api/projects` — archive list; filters pass through verbatim.
pub async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Envelope {
    let mut req = UpstreamRequest::get("/api/projects").bearer(bearer_token(&headers)).no_cache();
    if let Some(query) = query {
        req = req.query(query);
    }
    forward(&state, req).await.no_store()
}

/// `GET /api/projects/{id}`.
pub async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Envelope {
    let req = UpstreamRequest::get(format!("/api/projects/{id}")).bearer(bearer_token(&headers));
    forward(&state, req).await
}

/// `POST /api/projects` — metadata-only create. `title` is required.
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Envelope {
    create_record(&state, &headers, "/api/projects", "title", body).await
}

/// `POST /api/projects/{id}/files` — attach a thumbnail or slide deck to
/// an existing project.
pub async fn upload_project_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Envelope {
    upload_record_files(&state, &headers, &format!("/api/projects/{id}/files"), multipart).await
}

/// `POST /api/projects/with-files` — create the record and attach its
/// files in one call. A failed attach deletes the fresh record again.
pub async fn create_project_with_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Envelope {
    let token = bearer_token(&headers);
    if token.is_none() {
        return Envelope::unauthorized();
    }
    let mut parts = match collect_parts(multipart).await {
        Ok(parts) => parts,
        Err(envelope) => return envelope,
    };
    let Some(at) = parts.iter().position(|part| part.name == METADATA_FIELD) else {
        return Envelope::bad_request("multipart body must include a project field");
    };
    let metadata = parts.remove(at);
    let Ok(metadata) = serde_json::from_slice::<Value>(&metadata.data) else {
        return Envelope::bad_request("project field must be valid JSON");
    };
    if !has_text_field(&metadata, "title") {
        return Envelope::bad_request("title is required");
    }
    create_then_attach(
        &state,
        token,
        "/api/projects",
        |id| format!("/api/projects/{id}/files"),
        metadata,
        parts,
    )
    .await
}

/// `DELETE /api/projects/{id}` — the backend needs the object-storage
/// `fileKey` to drop the stored file along with the record.
pub async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Envelope {
    let Some(token) = bearer_token(&headers) else {
        return Envelope::unauthorized();
    };
    let Some(Json(body)) = body else {
        return Envelope::bad_request("request body must be JSON");
    };
    if !has_text_field(&body, "fileKey") {
        return Envelope::bad_request("fileKey is required");
    }
    let req = UpstreamRequest::delete(format!("/api/projects/{id}")).bearer(Some(token)).json(body);
    forward(&state, req).await
}

/// `GET /api/projects/{id}/presentation` — stream the stored file back
/// as-is for in-browser preview. This is the one route that answers raw
/// bytes instead of the envelope.
pub async fn presentation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/projects/{id}/presentation");
    match state.backend.fetch_raw(&path, bearer_token(&headers).as_deref()).await {
        Ok(raw) => raw_response(raw),
        Err(err) => {
            tracing::error!(error = %err, "presentation fetch failed");
            Envelope::backend_unavailable().into_response()
        }
    }
}

/// Re-emit a raw backend reply: status, content type and body unchanged.
fn raw_response(raw: RawReply) -> Response {
    let status = StatusCode::from_u16(raw.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = raw.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    match builder.body(Body::from(raw.body)) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "failed to assemble raw response");
            Envelope::backend_unavailable().into_response()
        }
    }
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
