use super::*;
use crate::net::types::{ApprovalStatus, Role};
use crate::util::storage::MemoryStore;

// =============================================================
// Helpers
// =============================================================

fn sample_profile() -> UserProfile {
    UserProfile {
        id: "u-1".to_owned(),
        name: "Alice".to_owned(),
        email: Some("alice@example.com".to_owned()),
        role: Role::Member,
        cohort: Some(13),
        status: ApprovalStatus::Approved,
    }
}

fn store_with_session() -> MemoryStore {
    let store = MemoryStore::default();
    persist_login(&store, "tok-1", &sample_profile());
    store
}

// =============================================================
// Restore
// =============================================================

#[test]
fn restore_with_both_keys_is_authenticated() {
    let store = store_with_session();
    let state = restore(&store);
    assert!(state.is_authenticated());
    assert!(!state.loading, "restore is synchronous, never loading");
    assert_eq!(state.token.as_deref(), Some("tok-1"));
    assert_eq!(state.user.unwrap(), sample_profile());
}

#[test]
fn restore_with_empty_storage_is_logged_out() {
    let store = MemoryStore::default();
    let state = restore(&store);
    assert!(!state.is_authenticated());
    assert_eq!(state.token, None);
}

#[test]
fn restore_with_corrupt_profile_clears_both_keys() {
    let store = MemoryStore::default();
    store.set(TOKEN_KEY, "tok-1");
    store.set(USER_KEY, "{not json");
    let state = restore(&store);
    assert!(!state.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(store.get(USER_KEY), None);
}

#[test]
fn restore_with_token_but_no_profile_clears_both_keys() {
    let store = MemoryStore::default();
    store.set(TOKEN_KEY, "tok-1");
    let state = restore(&store);
    assert!(!state.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn restore_with_profile_but_no_token_clears_both_keys() {
    let store = MemoryStore::default();
    store.set(
        USER_KEY,
        &serde_json::to_string(&sample_profile()).unwrap(),
    );
    let state = restore(&store);
    assert!(!state.is_authenticated());
    assert_eq!(store.get(USER_KEY), None);
}

// =============================================================
// Persist and clear
// =============================================================

#[test]
fn persist_login_writes_both_keys() {
    let store = MemoryStore::default();
    let state = persist_login(&store, "tok-9", &sample_profile());
    assert!(state.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY), Some("tok-9".to_owned()));
    let stored: UserProfile = serde_json::from_str(&store.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored, sample_profile());
}

#[test]
fn persist_then_restore_round_trips() {
    let store = MemoryStore::default();
    let persisted = persist_login(&store, "tok-9", &sample_profile());
    let restored = restore(&store);
    assert_eq!(restored, persisted);
}

#[test]
fn clear_removes_both_keys_and_is_idempotent() {
    let store = store_with_session();
    clear(&store);
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(store.get(USER_KEY), None);
    clear(&store);
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn default_state_is_logged_out_and_not_loading() {
    let state = SessionState::default();
    assert!(!state.is_authenticated());
    assert!(!state.loading);
}

// =============================================================
// Failure messages
// =============================================================

#[test]
fn login_failure_messages_map_statuses() {
    assert_eq!(login_failure_message(Some(401)), "Wrong email or password.");
    assert_eq!(
        login_failure_message(Some(403)),
        "Your account is awaiting approval."
    );
    assert_eq!(
        login_failure_message(Some(404)),
        "No account found for that email."
    );
    assert_eq!(
        login_failure_message(Some(429)),
        "Too many attempts. Try again in a minute."
    );
}

#[test]
fn login_failure_message_generic_fallback() {
    assert_eq!(
        login_failure_message(Some(500)),
        "Login failed. Please try again."
    );
    assert_eq!(login_failure_message(None), "Login failed. Please try again.");
}

// =============================================================
// Avatar cache
// =============================================================

#[test]
fn profile_image_cache_is_keyed_per_member() {
    let store = MemoryStore::default();
    cache_profile_image(&store, "m1", "https://cdn/a.png");
    cache_profile_image(&store, "m2", "https://cdn/b.png");
    assert_eq!(
        cached_profile_image(&store, "m1"),
        Some("https://cdn/a.png".to_owned())
    );
    assert_eq!(
        cached_profile_image(&store, "m2"),
        Some("https://cdn/b.png".to_owned())
    );
    assert_eq!(cached_profile_image(&store, "m3"), None);
}

#[test]
fn profile_image_cache_survives_session_clear() {
    let store = store_with_session();
    cache_profile_image(&store, "m1", "https://cdn/a.png");
    clear(&store);
    assert_eq!(
        cached_profile_image(&store, "m1"),
        Some("https://cdn/a.png".to_owned())
    );
}
