//! Chirp domain model and body validation.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Maximum chirp length, counted in Unicode scalar values rather than UTF-8
/// bytes, so a 140-character chirp in any script is accepted.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Row returned by chirp queries.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ChirpRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

/// Chirp validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChirpError {
    #[error("Chirp is too long")]
    TooLong,

    #[error("invalid sort direction: {0}")]
    InvalidSort(String),
}

/// Check a chirp body before it is stored.
pub fn validate_chirp_body(body: &str) -> Result<(), ChirpError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }
    Ok(())
}

/// Ordering of chirp listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ChirpError;

    /// Case-insensitive; an empty string means the default (ascending).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ChirpError::InvalidSort(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_length_limit() {
        assert!(validate_chirp_body("").is_ok());
        assert!(validate_chirp_body(&"a".repeat(140)).is_ok());
        assert_eq!(validate_chirp_body(&"a".repeat(141)), Err(ChirpError::TooLong));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        assert!(validate_chirp_body(&"é".repeat(140)).is_ok());
    }

    #[test]
    fn sort_order_parsing() {
        assert_eq!("".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!("Desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!(matches!(
            "sideways".parse::<SortOrder>(),
            Err(ChirpError::InvalidSort(_))
        ));
    }
}
