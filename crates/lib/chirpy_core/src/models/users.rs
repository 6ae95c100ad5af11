//! User domain model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user, including the stored password hash.
///
/// Never serialize this directly; the API layer copies the public fields
/// into its own response type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}
