use chrono::{DateTime, Utc};

/// Stored user record, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub age: u32,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `username` must already be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRow {
    pub username: String,
    pub email: String,
    pub age: u32,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRowChanges {
    pub email: Option<String>,
    pub age: Option<u32>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub token: String,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}
