//! Uniform JSON envelope for the same-origin API.
//!
//! DESIGN
//! ======
//! Every `/api` handler answers with the same shape no matter what the
//! backend sent: `success` plus `data` on the happy path, `error` and
//! `message` on failures. Upstream statuses are preserved so the browser
//! sees the real outcome; non-JSON upstream bodies are wrapped rather than
//! leaked as-is.

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::backend::{UpstreamPayload, UpstreamReply};

/// Longest upstream fragment echoed into the `error` field.
const ERROR_ECHO_LIMIT: usize = 200;

#[derive(Clone, Debug)]
pub struct Envelope {
    status: StatusCode,
    body: Value,
    no_store: bool,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "success": true, "data": data }),
            no_store: false,
        }
    }

    pub fn fail(status: StatusCode, error: &str, message: &str) -> Self {
        Self {
            status,
            body: json!({ "success": false, "error": error, "message": message }),
            no_store: false,
        }
    }

    /// 401 returned by the bearer guard on mutating routes.
    pub fn unauthorized() -> Self {
        Self::fail(StatusCode::UNAUTHORIZED, "unauthorized", "authorization token required")
    }

    pub fn bad_request(message: &str) -> Self {
        Self::fail(StatusCode::BAD_REQUEST, "bad request", message)
    }

    /// 500 shown when the backend is unreachable or sent garbage.
    pub fn backend_unavailable() -> Self {
        Self::fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "backend unavailable",
            "the backend service could not be reached",
        )
    }

    /// Normalize whatever the backend sent into the envelope shape.
    pub fn from_upstream(reply: UpstreamReply) -> Self {
        let status =
            StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match reply.payload {
            UpstreamPayload::Json(value) => normalize_json(status, value),
            UpstreamPayload::Text(text) => {
                if status.is_success() {
                    json!({ "success": true, "message": text })
                } else {
                    json!({ "success": false, "error": "upstream error", "message": text })
                }
            }
        };
        Self { status, body, no_store: false }
    }

    /// Reshape the `data` field of a success envelope; failures and
    /// data-less bodies pass through untouched.
    #[must_use]
    pub fn map_data(mut self, f: impl FnOnce(Value) -> Value) -> Self {
        if let Some(data) = self.body.get_mut("data") {
            let taken = data.take();
            *data = f(taken);
        }
        self
    }

    /// Set the human-readable `message` field.
    #[must_use]
    pub fn message(mut self, text: &str) -> Self {
        if let Some(object) = self.body.as_object_mut() {
            object.insert("message".to_string(), Value::String(text.to_string()));
        }
        self
    }

    /// Mark the response as non-cacheable on the way back to the browser.
    #[must_use]
    pub fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn succeeded(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    pub(crate) fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    #[cfg(test)]
    pub(crate) fn body_json(&self) -> &Value {
        &self.body
    }
}

/// JSON bodies that already carry a boolean `success` are envelopes from a
/// compatible backend and pass through; everything else gets wrapped.
fn normalize_json(status: StatusCode, value: Value) -> Value {
    if value.get("success").is_some_and(Value::is_boolean) {
        return value;
    }
    if status.is_success() {
        return json!({ "success": true, "data": value });
    }
    let error = field_string(&value, "error");
    let message = field_string(&value, "message");
    let (error, message) = match (error, message) {
        (Some(e), Some(m)) => (e, m),
        (Some(e), None) => (e.clone(), e),
        (None, Some(m)) => (m.clone(), m),
        (None, None) => ("upstream error".to_string(), compact(&value)),
    };
    json!({ "success": false, "error": error, "message": message })
}

fn field_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(ToString::to_string)
}

/// Compact rendering of an upstream body, capped so error payloads cannot
/// balloon the envelope.
fn compact(value: &Value) -> String {
    let text = value.to_string();
    if text.len() > ERROR_ECHO_LIMIT {
        text.chars().take(ERROR_ECHO_LIMIT).collect()
    } else {
        text
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if self.no_store {
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        }
        response
    }
}
