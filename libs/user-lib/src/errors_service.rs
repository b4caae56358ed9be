use crate::repository::errors::UserRepositoryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UserServiceError {
    #[error("username already exists")]
    UsernameAlreadyExists,

    #[error("resource not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid search field: {0}")]
    InvalidSearchField(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UserRepositoryError> for UserServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UsernameAlreadyExists => UserServiceError::UsernameAlreadyExists,
            UserRepositoryError::NotFound => UserServiceError::NotFound,
            UserRepositoryError::SessionAlreadyExists => {
                UserServiceError::Internal(anyhow::anyhow!("session token collision"))
            }
        }
    }
}
