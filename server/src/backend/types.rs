//! Request and reply types crossing the gateway seam.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use axum::body::Bytes;
use serde_json::Value;
use thiserror::Error;

// ===== REQUESTS =====

/// HTTP method subset the proxy forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One buffered multipart field, inbound or outbound.
#[derive(Clone, Debug)]
pub struct UploadPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Body attached to an upstream request.
#[derive(Clone, Debug)]
pub enum UpstreamBody {
    None,
    Json(Value),
    Multipart(Vec<UploadPart>),
}

/// A request to forward, built handler-side with the builder methods.
#[derive(Clone, Debug)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: UpstreamBody,
    /// Ask the backend (and anything between) not to serve a cached copy.
    pub no_cache: bool,
}

impl UpstreamRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            bearer: None,
            body: UpstreamBody::None,
            no_cache: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Raw query string, forwarded verbatim (no leading `?`).
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    /// Attach the caller's bearer token, when it sent one.
    #[must_use]
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = UpstreamBody::Json(body);
        self
    }

    #[must_use]
    pub fn multipart(mut self, parts: Vec<UploadPart>) -> Self {
        self.body = UpstreamBody::Multipart(parts);
        self
    }

    #[must_use]
    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }
}

// ===== REPLIES =====

/// Decoded reply payload: JSON when the backend said so, text otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum UpstreamPayload {
    Json(Value),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub payload: UpstreamPayload,
}

impl UpstreamReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, payload: UpstreamPayload::Json(body) }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self { status, payload: UpstreamPayload::Text(body.into()) }
    }
}

/// Raw binary passthrough used for file previews.
#[derive(Clone, Debug)]
pub struct RawReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

// ===== ERRORS =====

/// Gateway failures. Full detail is logged server-side; clients only ever
/// see the generic failure envelope.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to build backend HTTP client: {0}")]
    Build(String),
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("failed to read backend reply body: {0}")]
    BodyRead(String),
}
