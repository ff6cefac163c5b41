//! REST API helpers for talking to the gateway.
//!
//! Browser builds (`csr` feature): real HTTP calls via `gloo-net` against
//! the same-origin `/api/**` surface.
//! Native builds: stubs returning `ApiFailure` since these endpoints are
//! only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every fetcher returns `Result<_, ApiFailure>` instead of panicking so
//! pages can map failures to user-facing messages. The gateway replies with
//! a JSON envelope on every status, so decoding does not gate on
//! `resp.ok()`; the reply status rides along for message mapping.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "csr"))]
use super::types::ApiEnvelope;
use super::types::{
    Assignment, LoginPayload, Member, Project, RegisterRequest, StudySession, UserProfile,
};

/// A failed API call. Transport errors carry no status; HTTP-level failures
/// keep the reply status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    /// Failure returned by the server-side stubs.
    pub fn server_side() -> Self {
        Self {
            status: None,
            message: "not available on server".to_owned(),
        }
    }
}

#[cfg(any(test, feature = "csr"))]
fn members_endpoint(status: Option<&str>) -> String {
    match status {
        Some(status) => format!("/api/members?status={status}"),
        None => "/api/members".to_owned(),
    }
}

#[cfg(any(test, feature = "csr"))]
fn member_endpoint(id: &str) -> String {
    format!("/api/members/{id}")
}

#[cfg(any(test, feature = "csr"))]
fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "csr"))]
fn undecodable_reply_message(status: u16) -> String {
    format!("request failed with status {status}")
}

/// Convert a failure envelope into an `ApiFailure`, preferring the
/// human-oriented message over the error slug.
#[cfg(any(test, feature = "csr"))]
fn envelope_failure<T>(envelope: &ApiEnvelope<T>, status: u16) -> ApiFailure {
    ApiFailure {
        status: Some(status),
        message: envelope
            .message
            .clone()
            .or_else(|| envelope.error.clone())
            .unwrap_or_else(|| undecodable_reply_message(status)),
    }
}

/// Pull the payload out of an envelope whose success implies data.
#[cfg(any(test, feature = "csr"))]
fn unwrap_data<T>(envelope: ApiEnvelope<T>, status: u16) -> Result<T, ApiFailure> {
    if envelope.success {
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    Err(envelope_failure(&envelope, status))
}

/// Pull the payload out of an envelope where success without data is fine
/// (logout, register).
#[cfg(any(test, feature = "csr"))]
fn unwrap_optional<T>(envelope: ApiEnvelope<T>, status: u16) -> Result<Option<T>, ApiFailure> {
    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(envelope_failure(&envelope, status))
    }
}

/// Decode a list payload row by row, dropping rows that fail to decode so
/// one malformed record does not blank the whole page. Accepts a bare array
/// or an object wrapping the array under `wrapper_key`.
#[cfg(any(test, feature = "csr"))]
fn parse_rows<T>(data: serde_json::Value, wrapper_key: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    let rows = match data {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(mut map) => match map.remove(wrapper_key) {
            Some(serde_json::Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    rows.into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}

/// Decode a single-record payload.
#[cfg(any(test, feature = "csr"))]
fn parse_record<T>(data: serde_json::Value) -> Result<T, ApiFailure>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(data).map_err(|e| ApiFailure {
        status: None,
        message: format!("could not decode reply: {e}"),
    })
}

#[cfg(feature = "csr")]
fn transport_failure(error: &gloo_net::Error) -> ApiFailure {
    ApiFailure {
        status: None,
        message: error.to_string(),
    }
}

#[cfg(feature = "csr")]
async fn decode_envelope(
    resp: gloo_net::http::Response,
) -> Result<(ApiEnvelope<serde_json::Value>, u16), ApiFailure> {
    let status = resp.status();
    let envelope = resp
        .json::<ApiEnvelope<serde_json::Value>>()
        .await
        .map_err(|_| ApiFailure {
            status: Some(status),
            message: undecodable_reply_message(status),
        })?;
    Ok((envelope, status))
}

#[cfg(feature = "csr")]
async fn get_envelope(
    url: &str,
    token: Option<&str>,
) -> Result<(ApiEnvelope<serde_json::Value>, u16), ApiFailure> {
    let mut request = gloo_net::http::Request::get(url);
    if let Some(token) = token {
        request = request.header("Authorization", &bearer_value(token));
    }
    let resp = request.send().await.map_err(|e| transport_failure(&e))?;
    decode_envelope(resp).await
}

#[cfg(feature = "csr")]
async fn post_envelope<B>(
    url: &str,
    token: Option<&str>,
    body: Option<&B>,
) -> Result<(ApiEnvelope<serde_json::Value>, u16), ApiFailure>
where
    B: serde::Serialize,
{
    let mut request = gloo_net::http::Request::post(url);
    if let Some(token) = token {
        request = request.header("Authorization", &bearer_value(token));
    }
    let resp = match body {
        Some(body) => request
            .json(body)
            .map_err(|e| transport_failure(&e))?
            .send()
            .await
            .map_err(|e| transport_failure(&e))?,
        None => request.send().await.map_err(|e| transport_failure(&e))?,
    };
    decode_envelope(resp).await
}

/// Log in via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns an `ApiFailure` with the reply status on rejected credentials,
/// or without one on transport failure.
pub async fn login(identifier: &str, secret: &str) -> Result<LoginPayload, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let body = serde_json::json!({ "email": identifier, "password": secret });
        let (envelope, status) = post_envelope("/api/auth/login", None, Some(&body)).await?;
        let data = unwrap_data(envelope, status)?;
        parse_record(data)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (identifier, secret);
        Err(ApiFailure::server_side())
    }
}

/// Submit a signup request via `POST /api/auth/register`. New accounts start
/// in the pending state, so no session is created.
///
/// # Errors
///
/// Returns an `ApiFailure` when the backend rejects the signup.
pub async fn register(request: &RegisterRequest) -> Result<(), ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let (envelope, status) = post_envelope("/api/auth/register", None, Some(request)).await?;
        unwrap_optional(envelope, status).map(|_| ())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = request;
        Err(ApiFailure::server_side())
    }
}

/// Best-effort logout notification via `POST /api/auth/logout`. The caller
/// resets local session state whether or not this call lands.
pub async fn logout(token: Option<&str>) {
    #[cfg(feature = "csr")]
    {
        let _ = post_envelope::<serde_json::Value>("/api/auth/logout", token, None).await;
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
    }
}

/// Fetch the signed-in user's profile via `GET /api/auth/me`.
///
/// # Errors
///
/// Returns an `ApiFailure` carrying 401 when the token is missing, expired,
/// or rejected.
pub async fn fetch_me(token: &str) -> Result<UserProfile, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let (envelope, status) = get_envelope("/api/auth/me", Some(token)).await?;
        let data = unwrap_data(envelope, status)?;
        parse_record(data)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
        Err(ApiFailure::server_side())
    }
}

/// Fetch the member directory via `GET /api/members`, optionally filtered by
/// approval status.
///
/// # Errors
///
/// Returns an `ApiFailure` when the gateway or backend rejects the request.
pub async fn fetch_members(status: Option<&str>) -> Result<Vec<Member>, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let url = members_endpoint(status);
        let (envelope, reply_status) = get_envelope(&url, None).await?;
        let data = unwrap_data(envelope, reply_status)?;
        Ok(parse_rows(data, "members"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = status;
        Err(ApiFailure::server_side())
    }
}

/// Fetch a single member via `GET /api/members/{id}`.
///
/// # Errors
///
/// Returns an `ApiFailure` carrying 404 when the member does not exist.
pub async fn fetch_member(id: &str) -> Result<Member, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let url = member_endpoint(id);
        let (envelope, status) = get_envelope(&url, None).await?;
        let data = unwrap_data(envelope, status)?;
        parse_record(data)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = id;
        Err(ApiFailure::server_side())
    }
}

/// Fetch the project list via `GET /api/projects`.
///
/// # Errors
///
/// Returns an `ApiFailure` when the gateway or backend rejects the request.
pub async fn fetch_projects() -> Result<Vec<Project>, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let (envelope, status) = get_envelope("/api/projects", None).await?;
        let data = unwrap_data(envelope, status)?;
        Ok(parse_rows(data, "projects"))
    }
    #[cfg(not(feature = "csr"))]
    {
        Err(ApiFailure::server_side())
    }
}

/// Fetch study sessions via `GET /api/sessions`.
///
/// # Errors
///
/// Returns an `ApiFailure` when the gateway or backend rejects the request.
pub async fn fetch_sessions(token: Option<&str>) -> Result<Vec<StudySession>, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let (envelope, status) = get_envelope("/api/sessions", token).await?;
        let data = unwrap_data(envelope, status)?;
        Ok(parse_rows(data, "sessions"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
        Err(ApiFailure::server_side())
    }
}

/// Fetch assignments via `GET /api/assignments`.
///
/// # Errors
///
/// Returns an `ApiFailure` when the gateway or backend rejects the request.
pub async fn fetch_assignments(token: Option<&str>) -> Result<Vec<Assignment>, ApiFailure> {
    #[cfg(feature = "csr")]
    {
        let (envelope, status) = get_envelope("/api/assignments", token).await?;
        let data = unwrap_data(envelope, status)?;
        Ok(parse_rows(data, "assignments"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = token;
        Err(ApiFailure::server_side())
    }
}
