//! JWT access token issuance and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use super::{AuthError, AuthFailure};
use crate::models::auth::TokenClaims;

/// Issuer written into every access token.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Access token lifetime used when the caller has no preference: 1 hour.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Only the HMAC family is accepted when decoding.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Generate a signed JWT access token (HS256) for `user_id`, valid for `ttl`.
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Config("token secret cannot be empty".into()));
    }

    let now = Utc::now();
    let claims = TokenClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Config(format!("jwt encode: {e}")))
}

/// Verify a JWT access token and return the user id it was issued for.
///
/// Every failure is reported as [`AuthError::Unauthorized`]; the attached
/// [`AuthFailure`] tells expired tokens apart from forged ones for logging.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Config("token secret cannot be empty".into()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => AuthFailure::ExpiredToken,
            ErrorKind::InvalidAlgorithm => AuthFailure::WrongAlgorithm,
            ErrorKind::InvalidSignature => AuthFailure::BadSignature,
            _ => AuthFailure::MalformedToken,
        };
        debug!(%reason, "access token rejected");
        AuthError::Unauthorized(reason)
    })?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| {
        debug!("access token subject is not a uuid");
        AuthError::Unauthorized(AuthFailure::MalformedSubject)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_validates_to_same_user() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::minutes(15)).unwrap();
        assert!(!token.is_empty());
        assert_eq!(validate_access_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn empty_secret_is_config_error() {
        let err = issue_access_token(Uuid::new_v4(), "", Duration::minutes(15)).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::minutes(-1)).unwrap();
        let err = validate_access_token(&token, SECRET).unwrap_err();
        assert_eq!(err.reason(), Some(AuthFailure::ExpiredToken));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::minutes(15)).unwrap();
        let err = validate_access_token(&token, "another-secret").unwrap_err();
        assert_eq!(err.reason(), Some(AuthFailure::BadSignature));
    }

    #[test]
    fn claims_carry_issuer_and_window() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::seconds(90)).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let claims = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 90);
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        // {"alg":"RS256","typ":"JWT"} with a well-formed payload and junk signature.
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJpc3MiOiJjaGlycHkiLCJzdWIiOiIzZjJiMWM3ZS04YTRkLTRmMGUtOWI2MS0yZDVjN2E5ZTBmMTMiLCJpYXQiOjE3MDAwMDAwMDAsImV4cCI6NDEwMjQ0NDgwMH0.\
                     c2lnbmF0dXJl";
        let err = validate_access_token(token, SECRET).unwrap_err();
        assert_eq!(err.reason(), Some(AuthFailure::WrongAlgorithm));
    }

    #[test]
    fn none_algorithm_is_rejected() {
        // {"alg":"none","typ":"JWT"} with the same payload and no signature.
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJpc3MiOiJjaGlycHkiLCJzdWIiOiIzZjJiMWM3ZS04YTRkLTRmMGUtOWI2MS0yZDVjN2E5ZTBmMTMiLCJpYXQiOjE3MDAwMDAwMDAsImV4cCI6NDEwMjQ0NDgwMH0.";
        let err = validate_access_token(token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: TOKEN_ISSUER.into(),
            sub: "not-a-uuid".into(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = validate_access_token(&token, SECRET).unwrap_err();
        assert_eq!(err.reason(), Some(AuthFailure::MalformedSubject));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = validate_access_token("not.a.jwt", SECRET).unwrap_err();
        assert_eq!(err.reason(), Some(AuthFailure::MalformedToken));
    }
}
