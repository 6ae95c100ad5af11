//! In-process store with the same semantics as [`super::PgStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, USER_MISSING, UserStore};
use crate::models::auth::RefreshTokenRecord;
use crate::models::chirps::{ChirpRecord, SortOrder};
use crate::models::users::UserRecord;
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    chirps: Vec<ChirpRecord>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

/// A store that lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("email already exists".into()));
        }
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict("email already exists".into()));
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        *tables = Tables::default();
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<ChirpRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::Conflict(USER_MISSING.into()));
        }
        let now = Utc::now();
        let chirp = ChirpRecord {
            id: uuidv7(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<ChirpRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut chirps: Vec<ChirpRecord> = tables
            .chirps
            .iter()
            .filter(|c| author.is_none_or(|a| c.user_id == a))
            .cloned()
            .collect();
        chirps.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::Conflict(USER_MISSING.into()));
        }
        if tables.refresh_tokens.contains_key(token_hash) {
            return Err(StoreError::Conflict("refresh token already exists".into()));
        }
        let now = Utc::now();
        tables.refresh_tokens.insert(
            token_hash.to_string(),
            RefreshTokenRecord {
                token_hash: token_hash.to_string(),
                user_id,
                created_at: now,
                updated_at: now,
                expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn get_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.refresh_tokens.get(token_hash).cloned())
    }

    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token_hash) {
            Some(record) if record.revoked_at.is_none() => {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("a@example.com", "h").await.unwrap();
        let err = store.create_user("a@example.com", "h").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn chirps_filter_and_sort() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice@example.com", "h").await.unwrap();
        let bob = store.create_user("bob@example.com", "h").await.unwrap();
        let first = store.create_chirp("one", alice.id).await.unwrap();
        let second = store.create_chirp("two", bob.id).await.unwrap();
        let third = store.create_chirp("three", alice.id).await.unwrap();

        let all = store.list_chirps(None, SortOrder::Asc).await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);

        let alice_desc = store
            .list_chirps(Some(alice.id), SortOrder::Desc)
            .await
            .unwrap();
        let ids: Vec<_> = alice_desc.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);
    }

    #[tokio::test]
    async fn revoke_only_once() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "h").await.unwrap();
        store
            .create_refresh_token("abc", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        assert!(store.revoke_refresh_token("abc").await.unwrap());
        assert!(!store.revoke_refresh_token("abc").await.unwrap());
        assert!(!store.revoke_refresh_token("missing").await.unwrap());
    }

    #[tokio::test]
    async fn delete_all_users_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "h").await.unwrap();
        let chirp = store.create_chirp("hello", user.id).await.unwrap();
        store
            .create_refresh_token("abc", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.delete_all_users().await.unwrap();

        assert!(store.find_user_by_email("a@example.com").await.unwrap().is_none());
        assert!(store.get_chirp(chirp.id).await.unwrap().is_none());
        assert!(store.get_refresh_token("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upgrade_unknown_user_reports_false() {
        let store = MemoryStore::new();
        assert!(!store.upgrade_to_chirpy_red(Uuid::new_v4()).await.unwrap());
        let user = store.create_user("a@example.com", "h").await.unwrap();
        assert!(store.upgrade_to_chirpy_red(user.id).await.unwrap());
        let user = store.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert!(user.is_chirpy_red);
    }

    #[tokio::test]
    async fn rows_for_missing_user_conflict() {
        let store = MemoryStore::new();
        let ghost = Uuid::new_v4();

        let err = store.create_chirp("boo", ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == USER_MISSING));

        let err = store
            .create_refresh_token("abc", ghost, Utc::now() + Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == USER_MISSING));
    }
}
