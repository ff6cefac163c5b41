//! `/api/auth` — login, registration, logout and who-am-I.
//!
//! DESIGN
//! ======
//! Two modes. `local` answers from the fixed test-account directory so the
//! portal runs with no live backend; `upstream` forwards each call
//! verbatim and normalizes the reply like every other proxy route.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::backend::UpstreamRequest;
use crate::config::AuthMode;
use crate::envelope::Envelope;
use crate::services::accounts::AccountError;
use crate::state::AppState;

use super::forward;

/// Pull the token out of an `Authorization: Bearer ...` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").or_else(|| raw.strip_prefix("bearer "))?.trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}

/// Credential pair accepted by login. The portal sends
/// `identifier`/`secret`; older clients sent `email`/`password`.
#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(alias = "email", alias = "username")]
    identifier: String,
    #[serde(alias = "password")]
    secret: String,
}

/// `POST /api/auth/login` — directory check or upstream passthrough.
pub async fn login(State(state): State<AppState>, body: Option<Json<Value>>) -> Envelope {
    let Some(Json(body)) = body else {
        return Envelope::bad_request("request body must be JSON");
    };
    match state.config.auth_mode {
        AuthMode::Upstream => {
            forward(&state, UpstreamRequest::post("/api/auth/login").json(body)).await
        }
        AuthMode::Local => local_login(&state, &body),
    }
}

fn local_login(state: &AppState, body: &Value) -> Envelope {
    let Ok(creds) = serde_json::from_value::<LoginBody>(body.clone()) else {
        return Envelope::bad_request("identifier and secret are required");
    };
    let key = creds.identifier.trim().to_ascii_lowercase();
    if !state.throttle.allow(&key) {
        return Envelope::fail(
            StatusCode::TOO_MANY_REQUESTS,
            "throttled",
            "too many login attempts, try again later",
        );
    }
    match state.accounts.authenticate(&creds.identifier, &creds.secret) {
        Ok(profile) => {
            let token = state.accounts.mint_token(&profile);
            Envelope::ok(json!({ "token": token, "user": profile }))
        }
        Err(AccountError::UnknownUser) => Envelope::fail(
            StatusCode::NOT_FOUND,
            "unknown user",
            "no account with that identifier",
        ),
        Err(_) => Envelope::fail(
            StatusCode::UNAUTHORIZED,
            "invalid credentials",
            "identifier and secret do not match",
        ),
    }
}

/// `POST /api/auth/register` — member sign-up, live backend only.
pub async fn register(State(state): State<AppState>, body: Option<Json<Value>>) -> Envelope {
    let Some(Json(body)) = body else {
        return Envelope::bad_request("request body must be JSON");
    };
    match state.config.auth_mode {
        AuthMode::Upstream => {
            forward(&state, UpstreamRequest::post("/api/auth/register").json(body)).await
        }
        AuthMode::Local => Envelope::fail(
            StatusCode::SERVICE_UNAVAILABLE,
            "registration unavailable",
            "registration requires the live backend",
        ),
    }
}

/// `POST /api/auth/logout` — local tokens are stateless so this only
/// acknowledges; upstream mode forwards so the backend can revoke.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Envelope {
    let Some(token) = bearer_token(&headers) else {
        return Envelope::unauthorized();
    };
    match state.config.auth_mode {
        AuthMode::Local => Envelope::ok(json!({ "loggedOut": true })),
        AuthMode::Upstream => {
            forward(&state, UpstreamRequest::post("/api/auth/logout").bearer(Some(token))).await
        }
    }
}

/// `GET /api/auth/me` — who the bearer token belongs to.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Envelope {
    let Some(token) = bearer_token(&headers) else {
        return Envelope::unauthorized();
    };
    match state.config.auth_mode {
        AuthMode::Local => match state.accounts.verify_token(&token) {
            Ok(profile) => Envelope::ok(json!(profile)),
            Err(_) => Envelope::fail(
                StatusCode::UNAUTHORIZED,
                "invalid token",
                "token is invalid or expired",
            ),
        },
        AuthMode::Upstream => {
            forward(&state, UpstreamRequest::get("/api/auth/me").bearer(Some(token))).await
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
