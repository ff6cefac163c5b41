//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the parsed configuration, the gateway trait object for the
//! external backend, the local account directory and the login throttle.
//! Handlers themselves stay stateless; nothing here outlives a deploy.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::BackendApi;
use crate::config::Config;
use crate::services::accounts::AccountDirectory;
use crate::services::throttle::{LoginThrottle, ThrottleConfig};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn BackendApi>,
    pub accounts: Arc<AccountDirectory>,
    pub throttle: LoginThrottle,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<Config>, backend: Arc<dyn BackendApi>) -> Self {
        let accounts =
            Arc::new(AccountDirectory::new(config.token_secret.clone(), config.token_ttl_secs));
        let throttle = LoginThrottle::new(ThrottleConfig {
            max_attempts: config.login_max_attempts,
            window: Duration::from_secs(config.login_window_secs),
        });
        Self { config, backend, accounts, throttle }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
