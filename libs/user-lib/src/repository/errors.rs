#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRepositoryError {
    UsernameAlreadyExists,
    SessionAlreadyExists,
    NotFound,
}

impl std::fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRepositoryError::UsernameAlreadyExists => write!(f, "username already exists"),
            UserRepositoryError::SessionAlreadyExists => write!(f, "session already exists"),
            UserRepositoryError::NotFound => write!(f, "not found"),
        }
    }
}

impl std::error::Error for UserRepositoryError {}
