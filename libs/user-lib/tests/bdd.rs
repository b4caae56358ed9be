use cucumber::{given, then, when, World};

use user_lib::auth::{CredentialHasher, HashingConfig};
use user_lib::entities::{NewUser, PaginationParams, Session, User, UserStats};
use user_lib::errors_service::UserServiceError;
use user_lib::seeduser::{initialize_seed_user, SeedUserConfig};
use user_lib::user_service::UserService;

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct TestWorld {
    service: UserService,

    // State
    current_user: Option<User>,
    session: Option<Session>,
    users: Vec<User>,
    stats: Option<UserStats>,

    // Results
    error: Option<UserServiceError>,
}

impl TestWorld {
    fn new() -> Self {
        let hasher = CredentialHasher::new(HashingConfig {
            memory_kib: 64,
            iterations: 1,
        })
        .expect("valid hashing config");

        Self {
            service: UserService::new(hasher),
            current_user: None,
            session: None,
            users: vec![],
            stats: None,
            error: None,
        }
    }
}

// ==================== GIVEN ====================

#[given("a user service bootstrapped with the seed user")]
async fn seeded_service(world: &mut TestWorld) {
    initialize_seed_user(&world.service, &SeedUserConfig::default())
        .await
        .expect("seed user should be created");
}

// ==================== WHEN ====================

#[when(expr = "I create a user named {string}")]
async fn create_user(world: &mut TestWorld, username: String) {
    let result = world
        .service
        .create_user(NewUser {
            email: format!("{}@example.com", username.to_lowercase()),
            username,
            password: "Passw0rd!".to_string(),
            age: 25,
        })
        .await;

    match result {
        Ok(user) => world.current_user = Some(user),
        Err(e) => world.error = Some(e),
    }
}

#[when(expr = "I list users with limit {int} and offset {int}")]
async fn list_users(world: &mut TestWorld, limit: usize, offset: usize) {
    world.users = world
        .service
        .get_users(PaginationParams::new(Some(limit), Some(offset)))
        .await
        .expect("listing should succeed");
}

#[when(expr = "I search for {string} in field {string}")]
async fn search_users(world: &mut TestWorld, query: String, field: String) {
    match world.service.search_users(&query, &field).await {
        Ok(users) => world.users = users,
        Err(e) => world.error = Some(e),
    }
}

#[when("I delete the current user")]
async fn delete_current_user(world: &mut TestWorld) {
    let user = world.current_user.as_ref().expect("User should exist");
    if let Err(e) = world.service.delete_user(user.id).await {
        world.error = Some(e);
    }
}

#[when(expr = "I log in as {string} with password {string}")]
async fn log_in(world: &mut TestWorld, username: String, password: String) {
    match world.service.login(&username, &password).await {
        Ok(session) => world.session = Some(session),
        Err(e) => world.error = Some(e),
    }
}

#[when("I request stats with details")]
async fn request_stats(world: &mut TestWorld) {
    world.stats = Some(world.service.stats(true).await.expect("stats should succeed"));
}

// ==================== THEN ====================

#[then("the operation should succeed")]
async fn operation_succeeds(world: &mut TestWorld) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
}

#[then(expr = "the user should have username {string}")]
async fn user_has_username(world: &mut TestWorld, expected: String) {
    let user = world.current_user.as_ref().expect("User should exist");
    assert_eq!(user.username, expected);
}

#[then("the user should be active")]
async fn user_is_active(world: &mut TestWorld) {
    let user = world.current_user.as_ref().expect("User should exist");
    assert!(user.is_active);
}

#[then("I should receive a username already exists error")]
async fn username_exists_error(world: &mut TestWorld) {
    assert!(matches!(world.error, Some(UserServiceError::UsernameAlreadyExists)));
}

#[then(expr = "I should receive {int} users")]
async fn receive_users_count(world: &mut TestWorld, count: usize) {
    assert_eq!(world.users.len(), count);
}

#[then(expr = "the results should contain {string}")]
async fn results_contain(world: &mut TestWorld, username: String) {
    assert!(world.users.iter().any(|u| u.username == username));
}

#[then("I should receive an invalid search field error")]
async fn invalid_search_field_error(world: &mut TestWorld) {
    assert!(matches!(world.error, Some(UserServiceError::InvalidSearchField(_))));
}

#[then("the current user should no longer exist")]
async fn current_user_gone(world: &mut TestWorld) {
    let user = world.current_user.as_ref().expect("User should exist");
    assert!(world.service.get_user(user.id).await.unwrap().is_none());
}

#[then("I should receive a session token")]
async fn receive_session_token(world: &mut TestWorld) {
    let session = world.session.as_ref().expect("Session should exist");
    assert!(!session.token.is_empty());
}

#[then("I should receive an invalid credentials error")]
async fn invalid_credentials_error(world: &mut TestWorld) {
    assert!(world.session.is_none());
    assert!(matches!(world.error, Some(UserServiceError::InvalidCredentials)));
}

#[then("the stats should list the session token")]
async fn stats_list_token(world: &mut TestWorld) {
    let session = world.session.as_ref().expect("Session should exist");
    let details = world
        .stats
        .as_ref()
        .and_then(|s| s.details.as_ref())
        .expect("Details should be present");
    assert!(details.session_tokens.contains(&session.token));
}

#[then(expr = "the stats should list the email {string}")]
async fn stats_list_email(world: &mut TestWorld, email: String) {
    let details = world
        .stats
        .as_ref()
        .and_then(|s| s.details.as_ref())
        .expect("Details should be present");
    assert!(details.user_emails.contains(&email));
}

#[tokio::main]
async fn main() {
    TestWorld::run("tests/features").await;
}
