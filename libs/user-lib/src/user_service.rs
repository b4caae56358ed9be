use std::sync::Arc;

use crate::auth::{new_session_token, CredentialHasher};
use crate::entities::{
    NewUser, PaginationParams, SearchField, Session, StatsDetails, User, UserChanges, UserStats,
};
use crate::errors_service::UserServiceError;
use crate::repository::models::{NewUserRow, SessionRow, UserRow, UserRowChanges};
use crate::repository::traits::{SessionRepositoryTrait, UserRepositoryTrait};
use crate::repository::{InMemorySessionRepository, InMemoryUserRepository};
use crate::util::{normalize_username, validate_username};

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
        age: row.age,
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

fn session_from_row(row: SessionRow) -> Session {
    Session {
        token: row.token,
        user_id: row.user_id,
        created_at: row.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct UserService<U = InMemoryUserRepository, S = InMemorySessionRepository>
where
    U: UserRepositoryTrait,
    S: SessionRepositoryTrait,
{
    pub user_repo: Arc<U>,
    pub session_repo: Arc<S>,
    hasher: CredentialHasher,
}

impl UserService<InMemoryUserRepository, InMemorySessionRepository> {
    pub fn new(hasher: CredentialHasher) -> Self {
        Self {
            user_repo: Arc::new(InMemoryUserRepository::new()),
            session_repo: Arc::new(InMemorySessionRepository::new()),
            hasher,
        }
    }
}

impl<U, S> UserService<U, S>
where
    U: UserRepositoryTrait,
    S: SessionRepositoryTrait,
{
    pub fn with_repos(user_repo: Arc<U>, session_repo: Arc<S>, hasher: CredentialHasher) -> Self {
        Self {
            user_repo,
            session_repo,
            hasher,
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, UserServiceError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("verification task failed: {e}")))?
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserServiceError> {
        validate_username(&new_user.username).map_err(UserServiceError::Validation)?;
        let username = normalize_username(&new_user.username);

        let password_hash = self.hash_password(&new_user.password).await?;
        let row = self
            .user_repo
            .create_user(NewUserRow {
                username,
                email: new_user.email,
                age: new_user.age,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = row.id, username = %row.username, "user created");
        Ok(user_from_row(row))
    }

    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>, UserServiceError> {
        Ok(self.user_repo.get_user(user_id).await?.map(user_from_row))
    }

    pub async fn get_users(&self, pagination: PaginationParams) -> Result<Vec<User>, UserServiceError> {
        Ok(self
            .user_repo
            .get_users_paginated(pagination)
            .await?
            .into_iter()
            .map(user_from_row)
            .collect())
    }

    /// Applies `changes` to any user. Callers decide who may do that.
    pub async fn update_user(&self, user_id: u64, changes: UserChanges) -> Result<User, UserServiceError> {
        let password_hash = match changes.password.as_deref() {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let row = self
            .user_repo
            .update_user(
                user_id,
                UserRowChanges {
                    email: changes.email,
                    age: changes.age,
                    is_active: changes.is_active,
                    password_hash,
                },
            )
            .await?;

        tracing::info!(user_id = row.id, "user updated");
        Ok(user_from_row(row))
    }

    /// Removes the user and revokes every session it owns.
    pub async fn delete_user(&self, user_id: u64) -> Result<(), UserServiceError> {
        self.user_repo.delete_user(user_id).await?;
        let revoked = self.session_repo.delete_sessions_for_user(user_id).await?;
        tracing::info!(user_id, revoked_sessions = revoked, "user deleted");
        Ok(())
    }

    pub async fn search_users(&self, query: &str, field: &str) -> Result<Vec<User>, UserServiceError> {
        let field: SearchField = field
            .parse()
            .map_err(UserServiceError::InvalidSearchField)?;

        Ok(self
            .user_repo
            .search_users(query.trim(), field)
            .await?
            .into_iter()
            .map(user_from_row)
            .collect())
    }

    /// Checks a username/password pair. Inactive users never authenticate.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User, UserServiceError> {
        let row = self
            .user_repo
            .get_user_by_username(&normalize_username(username))
            .await?
            .ok_or(UserServiceError::InvalidCredentials)?;

        if !row.is_active || !self.verify_password(password, &row.password_hash).await? {
            return Err(UserServiceError::InvalidCredentials);
        }
        Ok(user_from_row(row))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, UserServiceError> {
        let user = self.verify_credentials(username, password).await?;
        let token = new_session_token();
        let row = self.session_repo.create_session(&token, user.id).await?;

        // A delete may have revoked sessions between the credential check and
        // the insert above; the user must still exist once the token is stored.
        if self.user_repo.get_user(user.id).await?.is_none() {
            self.session_repo.delete_session(&token).await?;
            tracing::warn!(user_id = user.id, "user deleted during login, session discarded");
            return Err(UserServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "session issued");
        Ok(session_from_row(row))
    }

    /// Resolves a bearer token to its session. The session is not tied to any target resource.
    pub async fn authenticate_token(&self, token: &str) -> Result<Session, UserServiceError> {
        self.session_repo
            .get_session(token)
            .await?
            .map(session_from_row)
            .ok_or(UserServiceError::InvalidCredentials)
    }

    pub async fn stats(&self, include_details: bool) -> Result<UserStats, UserServiceError> {
        let users = self.user_repo.get_users().await?;
        let sessions = self.session_repo.get_sessions().await?;

        let total_users = users.len() as u64;
        let active_users = users.iter().filter(|u| u.is_active).count() as u64;

        let details = include_details.then(|| StatsDetails {
            user_emails: users.iter().map(|u| u.email.clone()).collect(),
            session_tokens: sessions.iter().map(|s| s.token.clone()).collect(),
        });

        Ok(UserStats {
            total_users,
            active_users,
            inactive_users: total_users - active_users,
            active_sessions: sessions.len() as u64,
            details,
        })
    }
}
