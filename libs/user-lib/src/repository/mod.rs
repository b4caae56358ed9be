pub mod user_repository;
pub mod session_repository;
pub mod models;
pub mod errors;
pub mod traits;

pub use user_repository::InMemoryUserRepository;
pub use session_repository::InMemorySessionRepository;
pub use errors::UserRepositoryError;
