pub mod create_user;
pub mod delete_user;
pub mod entities;
pub mod get_stats;
pub mod get_user_by_id;
pub mod get_users;
pub mod health_check;
pub mod login;
pub mod root;
pub mod routes;
pub mod search_users;
pub mod update_user;

use crate::error::ApiError;

/// User ids are positive integers; anything else in the path is a client error.
pub(crate) fn parse_user_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(ApiError::invalid_user_id)
}
