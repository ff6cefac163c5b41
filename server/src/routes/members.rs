//! `/api/members` — directory listing, admissions lifecycle, avatars.
//!
//! DESIGN
//! ======
//! The backend stores member photos under `image` while the portal reads
//! `profileImage`, so read replies are reshaped before they leave. List
//! reads are cache-busted on both legs: an approval must be visible on
//! the very next directory load.

#[cfg(test)]
#[path = "members_test.rs"]
mod tests;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use crate::backend::UpstreamRequest;
use crate::envelope::Envelope;
use crate::state::AppState;

use super::auth::bearer_token;
use super::uploads::upload_record_files;
use super::{create_record, forward};

/// Admission states the directory can be filtered by.
const STATUSES: [&str; 3] = ["PENDING", "APPROVED", "REJECTED"];

/// Accepted list filters. Unknown params are dropped, not forwarded.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
}

/// `GET /api/members` — the club directory, optionally filtered by status.
pub async fn list_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Envelope {
    let mut req = UpstreamRequest::get("/api/members").bearer(bearer_token(&headers)).no_cache();
    if let Some(status) = query.status {
        let status = status.trim().to_ascii_uppercase();
        if !STATUSES.contains(&status.as_str()) {
            return Envelope::bad_request("status must be PENDING, APPROVED or REJECTED");
        }
        req = req.query(format!("status={status}"));
    }
    forward(&state, req).await.map_data(normalize_members).no_store()
}

/// `GET /api/members/{id}` — one member, reshaped like the list.
pub async fn get_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Envelope {
    let req = UpstreamRequest::get(format!("/api/members/{id}")).bearer(bearer_token(&headers));
    forward(&state, req).await.map_data(normalize_member)
}

/// `POST /api/members` — add a member record. `name` is the one field
/// every caller must send.
pub async fn create_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Envelope {
    create_record(&state, &headers, "/api/members", "name", body).await
}

/// `PUT /api/members/{id}` — profile edit, forwarded as-is.
pub async fn update_member(
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
    let req = UpstreamRequest::put(format!("/api/members/{id}")).bearer(Some(token)).json(body);
    forward(&state, req).await
}

/// `DELETE /api/members/{id}`.
pub async fn delete_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Envelope {
    let Some(token) = bearer_token(&headers) else {
        return Envelope::unauthorized();
    };
    forward(&state, UpstreamRequest::delete(format!("/api/members/{id}")).bearer(Some(token)))
        .await
}

/// `POST /api/members/{id}/approve` — admissions decision.
pub async fn approve_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Envelope {
    decide(&state, &headers, &id, "approve").await
}

/// `POST /api/members/{id}/reject`.
pub async fn reject_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Envelope {
    decide(&state, &headers, &id, "reject").await
}

async fn decide(state: &AppState, headers: &HeaderMap, id: &str, action: &str) -> Envelope {
    let Some(token) = bearer_token(headers) else {
        return Envelope::unauthorized();
    };
    let req = UpstreamRequest::post(format!("/api/members/{id}/{action}")).bearer(Some(token));
    forward(state, req).await
}

/// `POST /api/members/{id}/profile-image` — avatar upload, buffered and
/// re-sent upstream as a fresh multipart form.
pub async fn upload_member_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Envelope {
    upload_record_files(&state, &headers, &format!("/api/members/{id}/profile-image"), multipart)
        .await
}

/// Populate `profileImage` from the backend's `image` field. An existing
/// non-null `profileImage` wins; nulls count as absent.
fn normalize_member(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            let has_profile_image = map.get("profileImage").is_some_and(|v| !v.is_null());
            if !has_profile_image {
                if let Some(image) = map.get("image").filter(|v| !v.is_null()).cloned() {
                    map.insert("profileImage".to_string(), image);
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Apply the alias to whatever shape the list came back in: a bare array,
/// or an object wrapping a `members` array.
fn normalize_members(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_member).collect()),
        Value::Object(mut map) => {
            if let Some(members) = map.get_mut("members") {
                let taken = members.take();
                *members = normalize_members(taken);
            }
            Value::Object(map)
        }
        other => other,
    }
}
