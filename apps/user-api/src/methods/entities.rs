use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use user_lib::entities::{PaginationParams, Session, User, UserStats};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50, message = "username must be between 1 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
    #[validate(range(max = 150, message = "age must be between 0 and 150"))]
    pub age: u32,
}

/// Partial update; absent fields are left unchanged. Usernames are immutable.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(range(max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<u32>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub age: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub message: String,
    pub id: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Maximum number of users to return (1-1000, default 100)
    pub limit: Option<usize>,
    /// Number of users to skip, in creation order
    pub offset: Option<usize>,
}

impl From<PaginationQuery> for PaginationParams {
    fn from(query: PaginationQuery) -> Self {
        PaginationParams::new(query.limit, query.offset)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring to look for
    pub q: String,
    /// One of `username`, `email` or `all` (default)
    pub field: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: u64,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        LoginResponse {
            token: session.token,
            user_id: session.user_id,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    pub include_details: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub active_sessions: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_tokens: Option<Vec<String>>,
}

impl From<UserStats> for StatsResponse {
    fn from(stats: UserStats) -> Self {
        let (user_emails, session_tokens) = match stats.details {
            Some(details) => (Some(details.user_emails), Some(details.session_tokens)),
            None => (None, None),
        };

        StatsResponse {
            total_users: stats.total_users,
            active_users: stats.active_users,
            inactive_users: stats.inactive_users,
            active_sessions: stats.active_sessions,
            user_emails,
            session_tokens,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
