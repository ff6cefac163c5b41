//! Environment-driven configuration, assembled once at startup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every knob the gateway honors lives here: the single backend base URL,
//! listen port, static site directory, auth mode, token signing inputs and
//! the outbound timeouts. Route handlers read it through `AppState` and
//! never touch the environment directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 43_200;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOGIN_MAX_ATTEMPTS: usize = 10;
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;

/// Configuration errors are fatal; the binary refuses to start on a value
/// it would otherwise silently misread.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where login / who-am-I answers come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Fixed test-account directory; the portal works without the backend.
    Local,
    /// Auth calls are forwarded to the backend like every other route.
    Upstream,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the external backend, no trailing slash.
    pub backend_base_url: String,
    pub port: u16,
    /// Static site root served for anything outside `/api`.
    pub website_dir: PathBuf,
    pub auth_mode: AuthMode,
    /// Signing key for local tokens; `None` means a fresh random key per
    /// boot, which invalidates outstanding local tokens on restart.
    pub token_secret: Option<String>,
    pub token_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub login_max_attempts: usize,
    pub login_window_secs: u64,
}

impl Config {
    /// Read the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend_base_url: normalize_base_url(std::env::var("BACKEND_API_URL").ok().as_deref()),
            port: env_checked("PORT")?.unwrap_or(DEFAULT_PORT),
            website_dir: website_dir(),
            auth_mode: parse_auth_mode(std::env::var("AUTH_MODE").ok().as_deref())?,
            token_secret: std::env::var("AUTH_TOKEN_SECRET").ok(),
            token_ttl_secs: env_checked("AUTH_TOKEN_TTL_SECS")?.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            request_timeout_secs: env_checked("BACKEND_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_checked("BACKEND_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            login_max_attempts: env_checked("LOGIN_THROTTLE_MAX")?
                .unwrap_or(DEFAULT_LOGIN_MAX_ATTEMPTS),
            login_window_secs: env_checked("LOGIN_THROTTLE_WINDOW_SECS")?
                .unwrap_or(DEFAULT_LOGIN_WINDOW_SECS),
        })
    }
}

/// Resolve the static website directory.
fn website_dir() -> PathBuf {
    std::env::var("WEBSITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../website"))
}

/// Trim whitespace and any trailing slash so path joins stay predictable.
fn normalize_base_url(raw: Option<&str>) -> String {
    let url = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BACKEND_URL);
    url.trim_end_matches('/').to_string()
}

fn parse_auth_mode(raw: Option<&str>) -> Result<AuthMode, ConfigError> {
    match raw.map(str::trim) {
        None => Ok(AuthMode::Local),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "local" => Ok(AuthMode::Local),
            "upstream" => Ok(AuthMode::Upstream),
            _ => Err(ConfigError::Invalid { name: "AUTH_MODE", value: value.to_string() }),
        },
    }
}

/// Parse an env var, erroring when it is set to something unparseable.
fn env_checked<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(None),
    }
}
