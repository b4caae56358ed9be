use async_trait::async_trait;

use crate::entities::{PaginationParams, SearchField};
use crate::repository::errors::UserRepositoryError;
use crate::repository::models::{NewUserRow, SessionRow, UserRow, UserRowChanges};

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn create_user(&self, new_user: NewUserRow) -> Result<UserRow, UserRepositoryError>;
    async fn get_user(&self, user_id: u64) -> Result<Option<UserRow>, UserRepositoryError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, UserRepositoryError>;
    async fn update_user(&self, user_id: u64, changes: UserRowChanges) -> Result<UserRow, UserRepositoryError>;
    async fn delete_user(&self, user_id: u64) -> Result<(), UserRepositoryError>;
    async fn get_users(&self) -> Result<Vec<UserRow>, UserRepositoryError>;
    async fn get_users_paginated(&self, pagination: PaginationParams) -> Result<Vec<UserRow>, UserRepositoryError>;
    async fn search_users(&self, query: &str, field: SearchField) -> Result<Vec<UserRow>, UserRepositoryError>;
}

#[async_trait]
pub trait SessionRepositoryTrait: Send + Sync {
    async fn create_session(&self, token: &str, user_id: u64) -> Result<SessionRow, UserRepositoryError>;
    async fn get_session(&self, token: &str) -> Result<Option<SessionRow>, UserRepositoryError>;
    async fn delete_session(&self, token: &str) -> Result<bool, UserRepositoryError>;
    async fn delete_sessions_for_user(&self, user_id: u64) -> Result<u64, UserRepositoryError>;
    async fn get_sessions(&self) -> Result<Vec<SessionRow>, UserRepositoryError>;
}
