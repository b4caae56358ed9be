use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::entities::{PaginationParams, SearchField};
use crate::repository::errors::UserRepositoryError;
use crate::repository::models::{NewUserRow, UserRow, UserRowChanges};
use crate::repository::traits::UserRepositoryTrait;

#[derive(Debug)]
struct UserTable {
    next_id: u64,
    // Ids are allocated monotonically, so key order is creation order.
    rows: BTreeMap<u64, UserRow>,
    by_username: HashMap<String, u64>,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
            by_username: HashMap::new(),
        }
    }
}

/// Process-local user table guarded by a single lock.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(row: &UserRow, needle: &str, field: SearchField) -> bool {
    let username_hit = || row.username.to_lowercase().contains(needle);
    let email_hit = || row.email.to_lowercase().contains(needle);
    match field {
        SearchField::Username => username_hit(),
        SearchField::Email => email_hit(),
        SearchField::All => username_hit() || email_hit(),
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn create_user(&self, new_user: NewUserRow) -> Result<UserRow, UserRepositoryError> {
        let mut table = self.table.write().await;
        if table.by_username.contains_key(&new_user.username) {
            return Err(UserRepositoryError::UsernameAlreadyExists);
        }

        let id = table.next_id;
        table.next_id += 1;

        let row = UserRow {
            id,
            username: new_user.username,
            email: new_user.email,
            age: new_user.age,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: Utc::now(),
        };
        table.by_username.insert(row.username.clone(), id);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<UserRow>, UserRepositoryError> {
        Ok(self.table.read().await.rows.get(&user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, UserRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .by_username
            .get(username)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn update_user(&self, user_id: u64, changes: UserRowChanges) -> Result<UserRow, UserRepositoryError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&user_id)
            .ok_or(UserRepositoryError::NotFound)?;

        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(age) = changes.age {
            row.age = age;
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = is_active;
        }
        if let Some(password_hash) = changes.password_hash {
            row.password_hash = password_hash;
        }
        Ok(row.clone())
    }

    async fn delete_user(&self, user_id: u64) -> Result<(), UserRepositoryError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .remove(&user_id)
            .ok_or(UserRepositoryError::NotFound)?;
        table.by_username.remove(&row.username);
        Ok(())
    }

    async fn get_users(&self) -> Result<Vec<UserRow>, UserRepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get_users_paginated(&self, pagination: PaginationParams) -> Result<Vec<UserRow>, UserRepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .skip(pagination.offset)
            .take(pagination.limit)
            .cloned()
            .collect())
    }

    async fn search_users(&self, query: &str, field: SearchField) -> Result<Vec<UserRow>, UserRepositoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|row| matches_query(row, &needle, field))
            .cloned()
            .collect())
    }
}
