//! Fixed test-account directory and signed bearer tokens.
//!
//! DESIGN
//! ======
//! The portal must work without the live backend. Two well-known accounts
//! sign in locally and receive a stateless bearer token carrying its issue
//! time, a per-login nonce and a sha256 signature over a process secret.
//! Verification checks the signature and a TTL, so restarts and expiry
//! invalidate tokens without any server-side session table.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

/// Prefix marking locally issued credentials.
const TOKEN_SCHEME: &str = "local";

/// Tolerated clock skew for the issue timestamp, in seconds.
const ISSUED_AT_SKEW_SECS: i64 = 60;

const ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
const MEMBER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "MEMBER")]
    Member,
}

/// Profile handed out by login and who-am-I. Never carries the secret.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub cohort: u32,
    pub status: &'static str,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("unknown account")]
    UnknownUser,
    #[error("invalid credentials")]
    BadSecret,
    #[error("invalid or expired token")]
    BadToken,
}

pub struct AccountDirectory {
    secret_key: String,
    token_ttl_secs: i64,
}

impl AccountDirectory {
    /// `secret` of `None` generates a fresh random key for this process.
    pub fn new(secret: Option<String>, token_ttl_secs: u64) -> Self {
        let secret_key = secret.unwrap_or_else(random_secret);
        Self { secret_key, token_ttl_secs: i64::try_from(token_ttl_secs).unwrap_or(i64::MAX) }
    }

    /// Check a credential pair against the fixed directory.
    ///
    /// # Errors
    ///
    /// `UnknownUser` when the identifier is not in the directory (mapped to
    /// 404 by the login route), `BadSecret` when it is but the secret does
    /// not match (mapped to 401).
    pub fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<AccountProfile, AccountError> {
        let identifier = normalize_identifier(identifier);
        let (profile, expected) =
            account_for(&identifier).ok_or(AccountError::UnknownUser)?;
        if secret == expected { Ok(profile) } else { Err(AccountError::BadSecret) }
    }

    /// Issue `local.<id>.<issued_at>.<nonce>.<sig>` for a profile.
    pub fn mint_token(&self, profile: &AccountProfile) -> String {
        self.mint_token_at(profile, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Validate a token's signature and TTL, returning the owning profile.
    ///
    /// # Errors
    ///
    /// `BadToken` for anything that does not verify: wrong shape, unknown
    /// account, bad signature, expired or future-dated issue time.
    pub fn verify_token(&self, token: &str) -> Result<AccountProfile, AccountError> {
        self.verify_token_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// `mint_token` with a caller-chosen issue timestamp.
    pub(crate) fn mint_token_at(&self, profile: &AccountProfile, issued_at: i64) -> String {
        let nonce = random_nonce();
        let sig = self.signature(profile.id, issued_at, &nonce);
        format!("{TOKEN_SCHEME}.{}.{issued_at}.{nonce}.{sig}", profile.id.simple())
    }

    fn verify_token_at(&self, token: &str, now: i64) -> Result<AccountProfile, AccountError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [scheme, id, issued_at, nonce, sig] = parts.as_slice() else {
            return Err(AccountError::BadToken);
        };
        if *scheme != TOKEN_SCHEME {
            return Err(AccountError::BadToken);
        }
        let id = Uuid::try_parse(id).map_err(|_| AccountError::BadToken)?;
        let issued_at: i64 = issued_at.parse().map_err(|_| AccountError::BadToken)?;
        if self.signature(id, issued_at, nonce) != *sig {
            return Err(AccountError::BadToken);
        }
        if now - issued_at > self.token_ttl_secs || issued_at > now + ISSUED_AT_SKEW_SECS {
            return Err(AccountError::BadToken);
        }
        profile_for_id(id).ok_or(AccountError::BadToken)
    }

    fn signature(&self, id: Uuid, issued_at: i64, nonce: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret_key.as_bytes());
        hasher.update(b".");
        hasher.update(id.as_bytes());
        hasher.update(issued_at.to_be_bytes());
        hasher.update(nonce.as_bytes());
        bytes_to_hex(&hasher.finalize())
    }
}

fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase()
}

/// The directory itself: two accounts, secrets equal to their identifiers.
fn account_for(identifier: &str) -> Option<(AccountProfile, &'static str)> {
    match identifier {
        "admin" => Some((admin_profile(), "admin")),
        "member" => Some((member_profile(), "member")),
        _ => None,
    }
}

fn profile_for_id(id: Uuid) -> Option<AccountProfile> {
    match id {
        ADMIN_ID => Some(admin_profile()),
        MEMBER_ID => Some(member_profile()),
        _ => None,
    }
}

fn admin_profile() -> AccountProfile {
    AccountProfile {
        id: ADMIN_ID,
        name: "Admin".to_string(),
        email: "admin@bitamin.club".to_string(),
        role: Role::Admin,
        cohort: 13,
        status: "APPROVED",
    }
}

fn member_profile() -> AccountProfile {
    AccountProfile {
        id: MEMBER_ID,
        name: "Member".to_string(),
        email: "member@bitamin.club".to_string(),
        role: Role::Member,
        cohort: 14,
        status: "APPROVED",
    }
}

fn random_nonce() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn random_secret() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
