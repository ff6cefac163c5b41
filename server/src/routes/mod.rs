//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything under `/api` is a stateless proxy handler answering with the
//! uniform envelope; any other path falls through to the static club
//! website. CORS is permissive because the site and the API share an
//! origin in production and the dev server runs the site elsewhere.

pub mod assignments;
pub mod auth;
pub mod members;
pub mod projects;
pub mod sessions;
pub mod uploads;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::UpstreamRequest;
use crate::envelope::Envelope;
use crate::state::AppState;

/// Build the complete application router: API, health probe, static site.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/members", get(members::list_members).post(members::create_member))
        .route(
            "/api/members/{id}",
            get(members::get_member).put(members::update_member).delete(members::delete_member),
        )
        .route("/api/members/{id}/approve", post(members::approve_member))
        .route("/api/members/{id}/reject", post(members::reject_member))
        .route("/api/members/{id}/profile-image", post(members::upload_member_photo))
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route("/api/projects/with-files", post(projects::create_project_with_files))
        .route(
            "/api/projects/{id}",
            get(projects::get_project).delete(projects::delete_project),
        )
        .route("/api/projects/{id}/files", post(projects::upload_project_files))
        .route("/api/projects/{id}/presentation", get(projects::presentation))
        .route("/api/sessions", get(sessions::list_sessions).post(sessions::create_session))
        .route("/api/sessions/{id}/files", post(sessions::upload_session_files))
        .route(
            "/api/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/api/assignments/{id}/files", post(assignments::upload_assignment_files))
        .fallback_service(website)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Forward a request through the gateway and normalize the outcome.
/// Transport failures never escape as errors, only as the 500 envelope.
pub(crate) async fn forward(state: &AppState, req: UpstreamRequest) -> Envelope {
    match state.backend.send(req).await {
        Ok(reply) => Envelope::from_upstream(reply),
        Err(err) => {
            tracing::error!(error = %err, "backend request failed");
            Envelope::backend_unavailable()
        }
    }
}

/// True when `body[key]` is a non-blank string. Used by the create routes
/// for their one required field each.
pub(crate) fn has_text_field(body: &Value, key: &str) -> bool {
    body.get(key).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
}

/// Bearer-guarded JSON create requiring one non-blank text field. The
/// create routes differ only in their path and which field is mandatory.
pub(crate) async fn create_record(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
    required: &str,
    body: Option<Json<Value>>,
) -> Envelope {
    let Some(token) = auth::bearer_token(headers) else {
        return Envelope::unauthorized();
    };
    let Some(Json(body)) = body else {
        return Envelope::bad_request("request body must be JSON");
    };
    if !has_text_field(&body, required) {
        return Envelope::bad_request(&format!("{required} is required"));
    }
    forward(state, UpstreamRequest::post(path).bearer(Some(token)).json(body)).await
}
