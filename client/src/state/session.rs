//! Session lifecycle over browser storage.
//!
//! INVARIANT
//! =========
//! Storage holds the token and the profile both-or-neither. Every path that
//! detects a half-written or corrupt session removes both keys, so a reload
//! can never come up partially logged in.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::UserProfile;
use crate::util::storage::SessionStore;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "bitamin_token";
/// Storage key for the JSON-encoded user profile.
pub const USER_KEY: &str = "bitamin_user";
/// Key prefix for the per-member avatar URL cache.
const PROFILE_IMAGE_KEY_PREFIX: &str = "bitamin_profile_image.";

/// Session state, provided app-wide as `RwSignal<SessionState>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    /// True while the boot-time token check is in flight.
    pub loading: bool,
}

impl SessionState {
    /// Derived, never stored: a session is authenticated exactly when it
    /// holds a profile.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Restore the session from storage at app start.
///
/// Requires both keys present and a profile that parses; anything else is
/// treated as logged out and both keys are removed. Never errors.
pub fn restore(store: &impl SessionStore) -> SessionState {
    if let (Some(token), Some(user_json)) = (store.get(TOKEN_KEY), store.get(USER_KEY)) {
        if let Ok(user) = serde_json::from_str::<UserProfile>(&user_json) {
            return SessionState {
                user: Some(user),
                token: Some(token),
                loading: false,
            };
        }
    }
    clear(store);
    SessionState::default()
}

/// Persist a successful login and return the authenticated state.
///
/// The profile is serialized before anything is written, so a profile that
/// cannot serialize writes nothing.
pub fn persist_login(store: &impl SessionStore, token: &str, user: &UserProfile) -> SessionState {
    if let Ok(encoded) = serde_json::to_string(user) {
        store.set(TOKEN_KEY, token);
        store.set(USER_KEY, &encoded);
    }
    SessionState {
        user: Some(user.clone()),
        token: Some(token.to_owned()),
        loading: false,
    }
}

/// Remove both session keys. Safe to call repeatedly; used by logout whether
/// or not the server call succeeded.
pub fn clear(store: &impl SessionStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}

/// Map a login failure status to a user-facing message.
pub fn login_failure_message(status: Option<u16>) -> &'static str {
    match status {
        Some(401) => "Wrong email or password.",
        Some(403) => "Your account is awaiting approval.",
        Some(404) => "No account found for that email.",
        Some(429) => "Too many attempts. Try again in a minute.",
        _ => "Login failed. Please try again.",
    }
}

fn profile_image_key(member_id: &str) -> String {
    format!("{PROFILE_IMAGE_KEY_PREFIX}{member_id}")
}

/// Cache a member's avatar URL so pages can render avatars before the next
/// directory reply lands.
pub fn cache_profile_image(store: &impl SessionStore, member_id: &str, url: &str) {
    store.set(&profile_image_key(member_id), url);
}

/// Cached avatar URL for a member, if one was stored.
pub fn cached_profile_image(store: &impl SessionStore, member_id: &str) -> Option<String> {
    store.get(&profile_image_key(member_id))
}
