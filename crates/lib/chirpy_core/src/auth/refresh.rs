//! Opaque refresh tokens.
//!
//! Tokens are 64 random alphanumeric characters. Only their SHA-256 hash is
//! handed to the store, so a database leak does not expose live sessions.
//! Resolving a token never rotates or revokes it.

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use super::{AuthError, AuthFailure};
use crate::store::RefreshTokenStore;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

const REFRESH_TOKEN_LEN: usize = 64;

/// A freshly minted refresh token, as returned to the client.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a cryptographically random refresh token (64 alphanumeric chars).
pub fn generate_refresh_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Mint a refresh token for `user_id` and persist it with a 60-day expiry.
pub async fn issue_refresh_token<S>(store: &S, user_id: Uuid) -> Result<IssuedRefreshToken, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let token = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);
    store
        .create_refresh_token(&hash_refresh_token(&token), user_id, expires_at)
        .await?;
    debug!(%user_id, %expires_at, "refresh token issued");
    Ok(IssuedRefreshToken { token, expires_at })
}

/// Resolve a refresh token to its owning user.
///
/// Unknown, revoked and expired tokens all fail with
/// [`AuthError::Unauthorized`].
pub async fn resolve_refresh_token<S>(store: &S, token: &str) -> Result<Uuid, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = store
        .get_refresh_token(&hash_refresh_token(token))
        .await?
        .ok_or(AuthFailure::UnknownRefreshToken)?;

    let now = Utc::now();
    if record.revoked_at.is_some() {
        debug!(user_id = %record.user_id, "revoked refresh token presented");
        return Err(AuthFailure::RevokedRefreshToken.into());
    }
    if !record.is_usable_at(now) {
        debug!(user_id = %record.user_id, "expired refresh token presented");
        return Err(AuthFailure::ExpiredRefreshToken.into());
    }
    Ok(record.user_id)
}

/// Revoke a refresh token.
///
/// A token that never existed and one that was already revoked are reported
/// the same way, so callers cannot test whether a token exists.
pub async fn revoke_refresh_token<S>(store: &S, token: &str) -> Result<(), AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    if store.revoke_refresh_token(&hash_refresh_token(token)).await? {
        Ok(())
    } else {
        Err(AuthFailure::UnknownRefreshToken.into())
    }
}
