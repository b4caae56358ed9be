use std::sync::Arc;
use user_lib::repository::traits::{SessionRepositoryTrait, UserRepositoryTrait};
use user_lib::repository::{InMemorySessionRepository, InMemoryUserRepository};
use user_lib::user_service::UserService;

pub struct AppState<U = InMemoryUserRepository, S = InMemorySessionRepository>
where
    U: UserRepositoryTrait + Send + Sync + 'static,
    S: SessionRepositoryTrait + Send + Sync + 'static,
{
    pub user_service: Arc<UserService<U, S>>,
    pub env: String,
}

// Manual impl: the repositories themselves are not `Clone`, only the `Arc` around the service.
impl<U, S> Clone for AppState<U, S>
where
    U: UserRepositoryTrait + Send + Sync + 'static,
    S: SessionRepositoryTrait + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            env: self.env.clone(),
        }
    }
}

impl<U, S> AppState<U, S>
where
    U: UserRepositoryTrait + Send + Sync + 'static,
    S: SessionRepositoryTrait + Send + Sync + 'static,
{
    pub fn new(user_service: UserService<U, S>, env: impl Into<String>) -> Self {
        Self {
            user_service: Arc::new(user_service),
            env: env.into(),
        }
    }
}
