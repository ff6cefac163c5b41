//! reqwest-backed implementation of the gateway.

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

use crate::config::Config;

use super::BackendApi;
use super::types::{
    BackendError, Method, RawReply, UploadPart, UpstreamBody, UpstreamPayload, UpstreamReply,
    UpstreamRequest,
};

/// Product identifier sent with every upstream request.
const USER_AGENT: &str = concat!("bitamin-web/", env!("CARGO_PKG_VERSION"));

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build the shared client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Build` when the TLS stack cannot initialize.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BackendError::Build(e.to_string()))?;
        Ok(Self { client, base_url: config.backend_base_url.clone() })
    }
}

/// Join base, path and optional query into the upstream URL.
fn join_url(base: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{base}{path}?{q}"),
        _ => format!("{base}{path}"),
    }
}

/// Rebuild an inbound multipart body as an outbound reqwest form.
fn multipart_form(parts: Vec<UploadPart>) -> Result<reqwest::multipart::Form, BackendError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut piece = reqwest::multipart::Part::bytes(part.data.to_vec());
        if let Some(file_name) = part.file_name {
            piece = piece.file_name(file_name);
        }
        if let Some(mime) = part.content_type {
            piece = piece.mime_str(&mime).map_err(|e| BackendError::Request(e.to_string()))?;
        }
        form = form.part(part.name, piece);
    }
    Ok(form)
}

/// Decode a reply body as JSON when the content type (or the body itself)
/// says so; anything else stays text.
fn decode_payload(content_type: Option<&str>, body: &str) -> UpstreamPayload {
    let says_json = content_type.is_some_and(|ct| ct.contains("json"));
    if says_json || body.trim_start().starts_with(['{', '[']) {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            return UpstreamPayload::Json(value);
        }
    }
    UpstreamPayload::Text(body.to_string())
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamReply, BackendError> {
        let url = join_url(&self.base_url, &req.path, req.query.as_deref());
        let mut builder = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &req.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if req.no_cache {
            builder = builder.header(header::CACHE_CONTROL, "no-cache");
        }
        builder = match req.body {
            UpstreamBody::None => builder,
            UpstreamBody::Json(value) => builder.json(&value),
            UpstreamBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        let response =
            builder.send().await.map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let body = response.text().await.map_err(|e| BackendError::BodyRead(e.to_string()))?;
        Ok(UpstreamReply { status, payload: decode_payload(content_type.as_deref(), &body) })
    }

    async fn fetch_raw(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<RawReply, BackendError> {
        let mut builder = self.client.get(join_url(&self.base_url, path, None));
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response =
            builder.send().await.map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let body = response.bytes().await.map_err(|e| BackendError::BodyRead(e.to_string()))?;
        Ok(RawReply { status, content_type, body })
    }
}
