//! Multipart plumbing shared by the upload-capable routes.
//!
//! Uploads are buffered in full, then re-sent upstream as a fresh
//! multipart form. Club uploads are avatars and slide decks, so holding
//! them in memory is fine.

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;

use axum::extract::Multipart;
use axum::http::HeaderMap;
use serde_json::Value;

use crate::backend::{UploadPart, UpstreamRequest};
use crate::envelope::Envelope;
use crate::state::AppState;

use super::auth::bearer_token;
use super::forward;

/// Drain an inbound multipart body into buffered parts.
///
/// # Errors
///
/// Returns a 400 envelope when the body is not valid multipart or carries
/// no fields at all.
pub async fn collect_parts(mut multipart: Multipart) -> Result<Vec<UploadPart>, Envelope> {
    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return Err(Envelope::bad_request(&format!("invalid multipart body: {err}")));
            }
        };
        let name = field.name().unwrap_or("file").to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(err) => {
                return Err(Envelope::bad_request(&format!("failed to read upload: {err}")));
            }
        };
        parts.push(UploadPart { name, file_name, content_type, data });
    }
    if parts.is_empty() {
        return Err(Envelope::bad_request("no upload fields supplied"));
    }
    Ok(parts)
}

/// Forward buffered parts to an upstream upload path. Token required.
pub async fn send_upload(
    state: &AppState,
    token: Option<String>,
    path: &str,
    parts: Vec<UploadPart>,
) -> Envelope {
    let Some(token) = token else {
        return Envelope::unauthorized();
    };
    forward(state, UpstreamRequest::post(path).bearer(Some(token)).multipart(parts)).await
}

/// Complete handler body shared by every `{id}/files` style route:
/// guard, drain the form, re-send upstream.
pub async fn upload_record_files(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
    multipart: Multipart,
) -> Envelope {
    let Some(token) = bearer_token(headers) else {
        return Envelope::unauthorized();
    };
    let parts = match collect_parts(multipart).await {
        Ok(parts) => parts,
        Err(envelope) => return envelope,
    };
    send_upload(state, Some(token), path, parts).await
}

/// Create a record, then attach its files. When the attach leg fails the
/// record is deleted again, so callers never observe a half-made entity.
pub async fn create_then_attach(
    state: &AppState,
    token: Option<String>,
    create_path: &str,
    attach_path: impl Fn(&str) -> String,
    metadata: Value,
    parts: Vec<UploadPart>,
) -> Envelope {
    let Some(token) = token else {
        return Envelope::unauthorized();
    };

    let created = forward(
        state,
        UpstreamRequest::post(create_path).bearer(Some(token.clone())).json(metadata),
    )
    .await;
    if !created.succeeded() {
        return created;
    }
    let Some(id) = created_id(created.data()) else {
        tracing::warn!(path = create_path, "create reply carried no id, skipping file attach");
        return created;
    };
    if parts.is_empty() {
        return created;
    }

    let attached = forward(
        state,
        UpstreamRequest::post(attach_path(&id)).bearer(Some(token.clone())).multipart(parts),
    )
    .await;
    if attached.succeeded() {
        return created.message("files attached");
    }

    // Compensating delete: the attach failed, take the record back out.
    let rollback = forward(
        state,
        UpstreamRequest::delete(format!("{create_path}/{id}")).bearer(Some(token)),
    )
    .await;
    if !rollback.succeeded() {
        tracing::error!(path = create_path, id = %id, "rollback delete failed after attach failure");
    }
    attached
}

/// Pull the created record's id out of a success reply.
fn created_id(data: Option<&Value>) -> Option<String> {
    let data = data?;
    let id = data.get("id").or_else(|| data.get("data").and_then(|inner| inner.get("id")))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
