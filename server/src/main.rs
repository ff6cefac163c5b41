mod backend;
mod config;
mod envelope;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::backend::HttpBackend;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    let backend = HttpBackend::new(&config).expect("backend client init failed");

    let port = config.port;
    let backend_url = config.backend_base_url.clone();
    let auth_mode = config.auth_mode;

    let state = AppState::new(Arc::new(config), Arc::new(backend));
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, backend = %backend_url, mode = ?auth_mode, "bitamin gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}
