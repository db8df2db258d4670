//! Persisted session state.
//!
//! The session is two string values in a key-value store: the bearer token
//! and the JSON user payload. Writers are the login and logout transitions;
//! readers are the permission hook and the router, each building its own
//! view. Last write wins and nothing spans both keys atomically.

mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::models::user::UserData;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_DATA_KEY: &str = "userData";

/// String-valued key-value storage backing the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct StoredSession {
    pub token: String,
    pub user: UserData,
}

/// Typed access to the two session keys over any [`SessionStore`].
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn SessionStore>,
}

impl SessionRepository {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }

    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The stored token; an empty string counts as absent.
    pub async fn load_token(&self) -> AppResult<Option<String>> {
        let token = self.store.get(AUTH_TOKEN_KEY).await?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    /// The stored user payload. A payload that does not decode is an error,
    /// callers decide whether that means "absent".
    pub async fn load_user(&self) -> AppResult<Option<UserData>> {
        match self.store.get(USER_DATA_KEY).await? {
            Some(raw) => UserData::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Both keys present and the payload decodes.
    pub async fn load(&self) -> AppResult<Option<StoredSession>> {
        let Some(token) = self.load_token().await? else {
            return Ok(None);
        };
        let Some(user) = self.load_user().await? else {
            return Ok(None);
        };
        Ok(Some(StoredSession { token, user }))
    }

    pub async fn save(&self, token: &str, user: &Value) -> AppResult<()> {
        let payload = serde_json::to_string(user)?;
        self.store.set(AUTH_TOKEN_KEY, token).await?;
        self.store.set(USER_DATA_KEY, &payload).await?;
        Ok(())
    }

    /// Removes both keys. The second removal is attempted even if the first
    /// fails; the first failure is returned.
    pub async fn clear(&self) -> AppResult<()> {
        let token = self.store.remove(AUTH_TOKEN_KEY).await;
        let user = self.store.remove(USER_DATA_KEY).await;
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = SessionRepository::new(MemorySessionStore::new());
        repo.save("tok-1", &json!({"effective_role": "admin", "email": "a@example.com"}))
            .await
            .unwrap();

        let session = repo.load().await.unwrap().expect("session");
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.user.effective_role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn token_without_user_is_no_session() {
        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        let repo = SessionRepository::new(store);
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_token_is_absent() {
        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "").await.unwrap();
        store.set(USER_DATA_KEY, "{}").await.unwrap();
        let repo = SessionRepository::new(store);
        assert!(repo.load_token().await.unwrap().is_none());
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        store.set(USER_DATA_KEY, "{not json").await.unwrap();
        let repo = SessionRepository::new(store);
        assert!(repo.load().await.is_err());
    }

    #[tokio::test]
    async fn clear_removes_both_keys() {
        let repo = SessionRepository::new(MemorySessionStore::new());
        repo.save("tok", &json!({})).await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load_token().await.unwrap().is_none());
        assert!(repo.load_user().await.unwrap().is_none());
    }
}
