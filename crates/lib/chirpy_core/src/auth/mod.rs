//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT access tokens, opaque refresh tokens,
//! credential extraction from request headers and the ownership rule used by
//! mutating handlers. Nothing in here knows about HTTP status codes; callers
//! map [`AuthError`] variants onto their own responses.

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh;

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Why a credential was rejected.
///
/// Kept for logs and tests. It is never meant to reach a client: the
/// `Display` of [`AuthError::Unauthorized`] is the same for every reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("authorization header is missing")]
    MissingHeader,

    #[error("authorization header has the wrong scheme")]
    BadPrefix,

    #[error("credential is empty")]
    EmptyCredential,

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("api key does not match")]
    InvalidApiKey,

    #[error("token signed with an unexpected algorithm")]
    WrongAlgorithm,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    ExpiredToken,

    #[error("token is malformed")]
    MalformedToken,

    #[error("token subject is not a user id")]
    MalformedSubject,

    #[error("refresh token is unknown")]
    UnknownRefreshToken,

    #[error("refresh token has been revoked")]
    RevokedRefreshToken,

    #[error("refresh token has expired")]
    ExpiredRefreshToken,
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized(AuthFailure),

    #[error("forbidden")]
    Forbidden,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// The detailed rejection reason, if this is an `Unauthorized` error.
    pub fn reason(&self) -> Option<AuthFailure> {
        match self {
            AuthError::Unauthorized(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<AuthFailure> for AuthError {
    fn from(reason: AuthFailure) -> Self {
        AuthError::Unauthorized(reason)
    }
}

/// The user identity resolved from a validated access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal(pub Uuid);

impl Principal {
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

/// Allow a mutation only when the resource belongs to `principal`.
///
/// Callers load the resource first so that a missing resource is reported as
/// "not found" before ownership is considered.
pub fn ensure_owner(principal: Principal, owner: Uuid) -> Result<(), AuthError> {
    if principal.0 == owner {
        Ok(())
    } else {
        tracing::debug!(user_id = %principal.0, owner_id = %owner, "ownership check failed");
        Err(AuthError::Forbidden)
    }
}
