use super::*;

fn directory() -> AccountDirectory {
    AccountDirectory::new(Some("test-secret".to_string()), 3600)
}

// ===== AUTHENTICATION =====

#[test]
fn admin_credentials_authenticate() {
    let profile = directory().authenticate("admin", "admin").unwrap();
    assert_eq!(profile.role, Role::Admin);
    assert_eq!(profile.id, ADMIN_ID);
    assert_eq!(profile.status, "APPROVED");
}

#[test]
fn member_credentials_authenticate() {
    let profile = directory().authenticate("member", "member").unwrap();
    assert_eq!(profile.role, Role::Member);
    assert_eq!(profile.id, MEMBER_ID);
}

#[test]
fn identifier_is_trimmed_and_case_folded() {
    let profile = directory().authenticate("  Admin ", "admin").unwrap();
    assert_eq!(profile.role, Role::Admin);
}

#[test]
fn unknown_identifier_is_distinguished_from_bad_secret() {
    assert_eq!(directory().authenticate("nobody", "x").unwrap_err(), AccountError::UnknownUser);
    assert_eq!(directory().authenticate("admin", "wrong").unwrap_err(), AccountError::BadSecret);
}

#[test]
fn secret_comparison_is_exact() {
    assert!(directory().authenticate("admin", "ADMIN").is_err());
    assert!(directory().authenticate("admin", "admin ").is_err());
}

// ===== TOKENS =====

#[test]
fn minted_token_verifies_to_the_same_account() {
    let directory = directory();
    let profile = directory.authenticate("member", "member").unwrap();
    let token = directory.mint_token(&profile);
    assert!(token.starts_with("local."));
    let verified = directory.verify_token(&token).unwrap();
    assert_eq!(verified.id, profile.id);
    assert_eq!(verified.role, Role::Member);
}

#[test]
fn tokens_differ_per_login() {
    let directory = directory();
    let profile = directory.authenticate("admin", "admin").unwrap();
    assert_ne!(directory.mint_token(&profile), directory.mint_token(&profile));
}

#[test]
fn tampered_token_is_rejected() {
    let directory = directory();
    let profile = directory.authenticate("admin", "admin").unwrap();
    let mut token = directory.mint_token(&profile);
    token.pop();
    token.push('0');
    assert_eq!(directory.verify_token(&token).unwrap_err(), AccountError::BadToken);
}

#[test]
fn token_signed_with_another_key_is_rejected() {
    let other = AccountDirectory::new(Some("other-secret".to_string()), 3600);
    let profile = other.authenticate("admin", "admin").unwrap();
    let token = other.mint_token(&profile);
    assert!(directory().verify_token(&token).is_err());
}

#[test]
fn malformed_tokens_are_rejected() {
    let directory = directory();
    for garbage in ["", "local", "local.x.y", "bearer.a.b.c.d", "local.notauuid.0.aa.bb"] {
        assert_eq!(directory.verify_token(garbage).unwrap_err(), AccountError::BadToken);
    }
}

#[test]
fn expired_token_is_rejected() {
    let directory = directory();
    let profile = directory.authenticate("member", "member").unwrap();
    let issued_at = 1_000_000;
    let token = directory.mint_token_at(&profile, issued_at);
    assert!(directory.verify_token_at(&token, issued_at + 3599).is_ok());
    assert_eq!(
        directory.verify_token_at(&token, issued_at + 3601).unwrap_err(),
        AccountError::BadToken
    );
}

#[test]
fn future_dated_token_is_rejected() {
    let directory = directory();
    let profile = directory.authenticate("member", "member").unwrap();
    let token = directory.mint_token_at(&profile, 10_000);
    assert_eq!(directory.verify_token_at(&token, 9_000).unwrap_err(), AccountError::BadToken);
}

#[test]
fn profile_serializes_camel_case_without_secret() {
    let profile = directory().authenticate("admin", "admin").unwrap();
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["role"], "ADMIN");
    assert_eq!(value["cohort"], 13);
    assert_eq!(value["status"], "APPROVED");
    assert!(value.get("secret").is_none());
    assert!(value["id"].as_str().unwrap().ends_with('1'));
}
