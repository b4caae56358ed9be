use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repository::errors::UserRepositoryError;
use crate::repository::models::SessionRow;
use crate::repository::traits::SessionRepositoryTrait;

/// Token registry keyed by the opaque token string.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, SessionRow>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepositoryTrait for InMemorySessionRepository {
    async fn create_session(&self, token: &str, user_id: u64) -> Result<SessionRow, UserRepositoryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token) {
            return Err(UserRepositoryError::SessionAlreadyExists);
        }

        let row = SessionRow {
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        sessions.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRow>, UserRepositoryError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<bool, UserRepositoryError> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }

    async fn delete_sessions_for_user(&self, user_id: u64) -> Result<u64, UserRepositoryError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn get_sessions(&self) -> Result<Vec<SessionRow>, UserRepositoryError> {
        let mut rows: Vec<SessionRow> = self.sessions.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }
}
