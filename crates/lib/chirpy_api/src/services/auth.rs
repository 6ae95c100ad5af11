//! Authentication service: registration, login and session flows
//! delegating to `chirpy_core::auth`.

use chirpy_core::auth::{AuthFailure, Principal, jwt, password, refresh};
use chirpy_core::store::Store;
use chrono::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse, RefreshResponse, UserResponse};

/// Upper bound and default for access token lifetimes: 1 hour.
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = jwt::DEFAULT_ACCESS_TOKEN_TTL_SECS;

/// Hash verified when the email is unknown, so both failure paths cost a
/// bcrypt round.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Effective access token lifetime for a login request.
///
/// A positive request is honoured up to one hour; anything else gets the
/// one-hour default.
pub fn access_token_ttl(requested_secs: Option<i64>) -> Duration {
    match requested_secs {
        Some(secs) if secs > 0 => Duration::seconds(secs.min(MAX_ACCESS_TOKEN_TTL_SECS)),
        _ => Duration::seconds(MAX_ACCESS_TOKEN_TTL_SECS),
    }
}

// ---------------------------------------------------------------------------
// Password hashing on the blocking pool
// ---------------------------------------------------------------------------

async fn hash_password(plaintext: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| AppError::Internal(format!("hash task: {e}")))?
        .map_err(AppError::from)
}

async fn verify_password(plaintext: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task: {e}")))?
        .map_err(AppError::from)
}

/// The dummy hash, computed on the blocking pool the first time it is needed.
async fn dummy_hash() -> AppResult<&'static str> {
    DUMMY_HASH
        .get_or_try_init(|| hash_password("chirpy-dummy-password".to_string()))
        .await
        .map(String::as_str)
}

fn require_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public auth operations
// ---------------------------------------------------------------------------

/// Register a new user account.
pub async fn register(store: &dyn Store, email: &str, password: &str) -> AppResult<UserResponse> {
    require_credentials(email, password)?;

    let hashed = hash_password(password.to_string()).await?;
    let user = store.create_user(email, &hashed).await?;

    info!(user_id = %user.id, "user registered");
    Ok(user.into())
}

/// Authenticate with email + password and issue a token pair.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    store: &dyn Store,
    request: &LoginRequest,
    jwt_secret: &str,
) -> AppResult<LoginResponse> {
    require_credentials(&request.email, &request.password)?;

    let user = store.find_user_by_email(&request.email).await?;

    let Some(user) = user else {
        let dummy = dummy_hash().await?;
        verify_password(request.password.clone(), dummy.to_string()).await?;
        return Err(AuthFailure::InvalidCredentials.into());
    };

    if !verify_password(request.password.clone(), user.hashed_password.clone()).await? {
        return Err(AuthFailure::InvalidCredentials.into());
    }

    let ttl = access_token_ttl(request.expires_in_seconds);
    let token = jwt::issue_access_token(user.id, jwt_secret, ttl)?;
    let issued = refresh::issue_refresh_token(store, user.id).await?;

    info!(user_id = %user.id, ttl_secs = ttl.num_seconds(), "user logged in");
    Ok(LoginResponse {
        user: user.into(),
        token,
        refresh_token: issued.token,
    })
}

/// Mint a fresh one-hour access token from a refresh token.
///
/// The refresh token itself stays valid; it is not rotated.
pub async fn refresh_access_token(
    store: &dyn Store,
    refresh_token: &str,
    jwt_secret: &str,
) -> AppResult<RefreshResponse> {
    let user_id = refresh::resolve_refresh_token(store, refresh_token).await?;
    let token = jwt::issue_access_token(
        user_id,
        jwt_secret,
        Duration::seconds(MAX_ACCESS_TOKEN_TTL_SECS),
    )?;
    Ok(RefreshResponse { token })
}

/// Revoke a refresh token.
pub async fn revoke_refresh_token(store: &dyn Store, refresh_token: &str) -> AppResult<()> {
    refresh::revoke_refresh_token(store, refresh_token).await?;
    Ok(())
}

/// Replace the principal's email and password.
pub async fn update_user(
    store: &dyn Store,
    principal: Principal,
    email: &str,
    password: &str,
) -> AppResult<UserResponse> {
    require_credentials(email, password)?;

    let hashed = hash_password(password.to_string()).await?;
    let user = store
        .update_user(principal.user_id(), email, &hashed)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    info!(user_id = %user.id, "user credentials updated");
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use chirpy_core::store::MemoryStore;

    use super::*;

    const SECRET: &str = "test-secret";

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
            expires_in_seconds: None,
        }
    }

    #[test]
    fn ttl_is_clamped_to_one_hour() {
        assert_eq!(access_token_ttl(Some(7200)), Duration::seconds(3600));
        assert_eq!(access_token_ttl(Some(60)), Duration::seconds(60));
        assert_eq!(access_token_ttl(Some(0)), Duration::seconds(3600));
        assert_eq!(access_token_ttl(Some(-5)), Duration::seconds(3600));
        assert_eq!(access_token_ttl(None), Duration::seconds(3600));
    }

    #[tokio::test]
    async fn dummy_hash_is_built_once() {
        let first = dummy_hash().await.unwrap();
        let second = dummy_hash().await.unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(verify_password("chirpy-dummy-password".into(), first.to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn register_requires_email_and_password() {
        let store = MemoryStore::new();
        let err = register(&store, "", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = register(&store, "a@example.com", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_round_trip() {
        let store = MemoryStore::new();
        let user = register(&store, "a@example.com", "secret1").await.unwrap();

        let resp = login(&store, &login_request("a@example.com", "secret1"), SECRET)
            .await
            .unwrap();
        assert_eq!(resp.user.id, user.id);
        assert_eq!(jwt::validate_access_token(&resp.token, SECRET).unwrap(), user.id);
        assert_eq!(
            refresh::resolve_refresh_token(&store, &resp.refresh_token)
                .await
                .unwrap(),
            user.id
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() {
        let store = MemoryStore::new();
        register(&store, "a@example.com", "secret1").await.unwrap();

        let wrong = login(&store, &login_request("a@example.com", "wrong"), SECRET)
            .await
            .unwrap_err();
        let unknown = login(&store, &login_request("b@example.com", "secret1"), SECRET)
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn refresh_does_not_rotate() {
        let store = MemoryStore::new();
        register(&store, "a@example.com", "secret1").await.unwrap();
        let resp = login(&store, &login_request("a@example.com", "secret1"), SECRET)
            .await
            .unwrap();

        refresh_access_token(&store, &resp.refresh_token, SECRET).await.unwrap();
        refresh_access_token(&store, &resp.refresh_token, SECRET).await.unwrap();

        revoke_refresh_token(&store, &resp.refresh_token).await.unwrap();
        let err = refresh_access_token(&store, &resp.refresh_token, SECRET)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn update_changes_password() {
        let store = MemoryStore::new();
        let user = register(&store, "a@example.com", "secret1").await.unwrap();

        let updated = update_user(&store, Principal(user.id), "b@example.com", "secret2")
            .await
            .unwrap();
        assert_eq!(updated.email, "b@example.com");

        assert!(
            login(&store, &login_request("b@example.com", "secret1"), SECRET)
                .await
                .is_err()
        );
        assert!(
            login(&store, &login_request("b@example.com", "secret2"), SECRET)
                .await
                .is_ok()
        );
    }
}
