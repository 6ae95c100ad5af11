//! Persistence collaborators.
//!
//! The authentication core and the API handlers only talk to these traits.
//! [`PgStore`] is the production implementation; [`MemoryStore`] backs tests
//! and the server's in-memory development mode.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::RefreshTokenRecord;
use crate::models::chirps::{ChirpRecord, SortOrder};
use crate::models::users::UserRecord;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// [`StoreError::Conflict`] message for a row whose owning user is gone.
pub const USER_MISSING: &str = "user does not exist";

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. A duplicate email is a [`StoreError::Conflict`].
    async fn create_user(&self, email: &str, hashed_password: &str)
    -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Replace a user's email and password hash. `None` if the user is gone.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Set the Chirpy Red flag. Returns `false` if no such user exists.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Delete every user together with their chirps and refresh tokens.
    async fn delete_all_users(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<ChirpRecord, StoreError>;

    /// List chirps ordered by creation time, optionally for one author.
    async fn list_chirps(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<ChirpRecord>, StoreError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError>;

    /// Returns `false` if the chirp did not exist.
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn create_refresh_token(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Look a token up regardless of its revocation or expiry state.
    async fn get_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Mark a token revoked. Returns `true` only if an unrevoked row was updated.
    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<bool, StoreError>;
}

/// Everything the API needs from persistence.
pub trait Store: UserStore + ChirpStore + RefreshTokenStore {}

impl<T> Store for T where T: UserStore + ChirpStore + RefreshTokenStore {}
