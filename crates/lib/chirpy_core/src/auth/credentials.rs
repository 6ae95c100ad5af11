//! Credential extraction from request headers.
//!
//! Two schemes are understood on the `Authorization` header: `Bearer <token>`
//! for users and `ApiKey <key>` for the billing webhook.

use http::HeaderMap;
use http::header::AUTHORIZATION;
use sha2::{Digest, Sha256};

use super::{AuthError, AuthFailure};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract the token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_with_prefix(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_with_prefix(headers, API_KEY_PREFIX)
}

/// Compare a presented API key against the configured one in constant time.
pub fn verify_api_key(presented: &str, expected: &str) -> Result<(), AuthError> {
    // Comparing digests keeps the loop length independent of either input.
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    if diff == 0 {
        Ok(())
    } else {
        Err(AuthFailure::InvalidApiKey.into())
    }
}

fn extract_with_prefix(headers: &HeaderMap, prefix: &str) -> Result<String, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?;
    if value.is_empty() {
        return Err(AuthFailure::MissingHeader.into());
    }
    let value = value.to_str().map_err(|_| AuthFailure::BadPrefix)?;
    let credential = value.strip_prefix(prefix).ok_or(AuthFailure::BadPrefix)?.trim();
    if credential.is_empty() {
        return Err(AuthFailure::EmptyCredential.into());
    }
    Ok(credential.to_string())
}
