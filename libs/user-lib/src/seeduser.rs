/// Seed user bootstrap
///
/// Creates the well-known login account the API ships with. Called once from
/// server startup, after the service is built and before the listener opens.
use crate::entities::{NewUser, User};
use crate::errors_service::UserServiceError;
use crate::repository::traits::{SessionRepositoryTrait, UserRepositoryTrait};
use crate::user_service::UserService;
use crate::util::{normalize_username, validate_username};

pub const SEED_USER_USERNAME: &str = "SEED_USER_USERNAME";
pub const SEED_USER_PASSWORD: &str = "SEED_USER_PASSWORD";
pub const SEED_USER_EMAIL: &str = "SEED_USER_EMAIL";
pub const SEED_USER_AGE: &str = "SEED_USER_AGE";

#[derive(Debug, Clone)]
pub struct SeedUserConfig {
    pub username: String,
    pub password: String,
    pub email: String,
    pub age: u32,
}

impl Default for SeedUserConfig {
    fn default() -> Self {
        Self {
            username: "john_doe".to_string(),
            password: "password123".to_string(),
            email: "john@example.com".to_string(),
            age: 30,
        }
    }
}

impl SeedUserConfig {
    /// Load seed user configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        let default = Self::default();

        let username = std::env::var(SEED_USER_USERNAME).unwrap_or(default.username);
        let password = std::env::var(SEED_USER_PASSWORD).unwrap_or(default.password);
        let email = std::env::var(SEED_USER_EMAIL).unwrap_or(default.email);
        let age = match std::env::var(SEED_USER_AGE) {
            Ok(v) => v
                .parse()
                .map_err(|_| format!("{SEED_USER_AGE} must be a non-negative integer"))?,
            Err(_) => default.age,
        };

        validate_username(&username).map_err(|e| format!("{SEED_USER_USERNAME}: {e}"))?;
        if password.is_empty() {
            return Err(format!("{SEED_USER_PASSWORD} cannot be empty"));
        }

        Ok(Self {
            username,
            password,
            email,
            age,
        })
    }
}

/// Creates the seed user unless an account with the same normalized username exists.
pub async fn initialize_seed_user<U, S>(
    service: &UserService<U, S>,
    config: &SeedUserConfig,
) -> Result<User, UserServiceError>
where
    U: UserRepositoryTrait,
    S: SessionRepositoryTrait,
{
    let username = normalize_username(&config.username);

    if let Some(existing) = service.user_repo.get_user_by_username(&username).await? {
        tracing::info!(user_id = existing.id, username = %username, "seed user already exists");
        return service
            .get_user(existing.id)
            .await?
            .ok_or(UserServiceError::NotFound);
    }

    let user = service
        .create_user(NewUser {
            username: config.username.clone(),
            email: config.email.clone(),
            password: config.password.clone(),
            age: config.age,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "seed user initialized");
    Ok(user)
}
