use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;

use user_lib::auth::{CredentialHasher, HashingConfig};
use user_lib::entities::{NewUser, PaginationParams, SearchField, UserChanges};
use user_lib::errors_service::UserServiceError;
use user_lib::repository::errors::UserRepositoryError;
use user_lib::repository::models::{NewUserRow, SessionRow, UserRow, UserRowChanges};
use user_lib::repository::traits::{SessionRepositoryTrait, UserRepositoryTrait};
use user_lib::user_service::UserService;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepositoryTrait for UserRepo {
        async fn create_user(&self, new_user: NewUserRow) -> Result<UserRow, UserRepositoryError>;
        async fn get_user(&self, user_id: u64) -> Result<Option<UserRow>, UserRepositoryError>;
        async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, UserRepositoryError>;
        async fn update_user(&self, user_id: u64, changes: UserRowChanges) -> Result<UserRow, UserRepositoryError>;
        async fn delete_user(&self, user_id: u64) -> Result<(), UserRepositoryError>;
        async fn get_users(&self) -> Result<Vec<UserRow>, UserRepositoryError>;
        async fn get_users_paginated(&self, pagination: PaginationParams) -> Result<Vec<UserRow>, UserRepositoryError>;
        async fn search_users(&self, query: &str, field: SearchField) -> Result<Vec<UserRow>, UserRepositoryError>;
    }
}

mock! {
    pub SessionRepo {}

    #[async_trait]
    impl SessionRepositoryTrait for SessionRepo {
        async fn create_session(&self, token: &str, user_id: u64) -> Result<SessionRow, UserRepositoryError>;
        async fn get_session(&self, token: &str) -> Result<Option<SessionRow>, UserRepositoryError>;
        async fn delete_session(&self, token: &str) -> Result<bool, UserRepositoryError>;
        async fn delete_sessions_for_user(&self, user_id: u64) -> Result<u64, UserRepositoryError>;
        async fn get_sessions(&self) -> Result<Vec<SessionRow>, UserRepositoryError>;
    }
}

fn test_hasher() -> CredentialHasher {
    CredentialHasher::new(HashingConfig {
        memory_kib: 64,
        iterations: 1,
    })
    .unwrap()
}

fn create_test_service(
    user_repo: MockUserRepo,
    session_repo: MockSessionRepo,
) -> UserService<MockUserRepo, MockSessionRepo> {
    UserService::with_repos(Arc::new(user_repo), Arc::new(session_repo), test_hasher())
}

fn user_row(id: u64, username: &str, password_hash: &str) -> UserRow {
    UserRow {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        age: 25,
        password_hash: password_hash.to_string(),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn session_row(token: &str, user_id: u64) -> SessionRow {
    SessionRow {
        token: token.to_string(),
        user_id,
        created_at: Utc::now(),
    }
}

// ==================== CREATE USER TESTS ====================

#[tokio::test]
async fn test_create_user_normalizes_and_hashes() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_create_user()
        .withf(|row| {
            row.username == "altan_tmp"
                && row.password_hash != "Passw0rd!"
                && row.password_hash.starts_with("$argon2id$")
        })
        .times(1)
        .returning(|row| Ok(user_row(7, &row.username, &row.password_hash)));

    let service = create_test_service(user_repo, session_repo);
    let result = service
        .create_user(NewUser {
            username: "Altan_Tmp".to_string(),
            email: "altan@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            age: 25,
        })
        .await;

    let user = result.unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.username, "altan_tmp");
    assert!(user.is_active);
}

#[tokio::test]
async fn test_create_user_duplicate() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_create_user()
        .times(1)
        .returning(|_| Err(UserRepositoryError::UsernameAlreadyExists));

    let service = create_test_service(user_repo, session_repo);
    let result = service
        .create_user(NewUser {
            username: "dup_user".to_string(),
            email: "dup@example.com".to_string(),
            password: "pw".to_string(),
            age: 25,
        })
        .await;

    assert!(matches!(result, Err(UserServiceError::UsernameAlreadyExists)));
}

#[tokio::test]
async fn test_create_user_padded_username_skips_repository() {
    let user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    let service = create_test_service(user_repo, session_repo);
    let result = service
        .create_user(NewUser {
            username: " Alice ".to_string(),
            email: "alice@example.com".to_string(),
            password: "pw".to_string(),
            age: 25,
        })
        .await;

    assert!(matches!(result, Err(UserServiceError::Validation(_))));
}

#[tokio::test]
async fn test_create_user_blank_username_skips_repository() {
    let user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    let service = create_test_service(user_repo, session_repo);
    let result = service
        .create_user(NewUser {
            username: "   ".to_string(),
            email: "blank@example.com".to_string(),
            password: "pw".to_string(),
            age: 25,
        })
        .await;

    assert!(matches!(result, Err(UserServiceError::Validation(_))));
}

// ==================== UPDATE / DELETE TESTS ====================

#[tokio::test]
async fn test_update_user_hashes_new_password() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_update_user()
        .withf(|id, changes| {
            *id == 3
                && changes.email.as_deref() == Some("new@example.com")
                && changes
                    .password_hash
                    .as_deref()
                    .is_some_and(|h| h.starts_with("$argon2id$"))
        })
        .times(1)
        .returning(|id, changes| {
            let mut row = user_row(id, "carol", "old");
            row.email = changes.email.unwrap();
            Ok(row)
        });

    let service = create_test_service(user_repo, session_repo);
    let user = service
        .update_user(
            3,
            UserChanges {
                email: Some("new@example.com".to_string()),
                password: Some("fresh".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.email, "new@example.com");
}

#[tokio::test]
async fn test_update_missing_user() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_update_user()
        .times(1)
        .returning(|_, _| Err(UserRepositoryError::NotFound));

    let service = create_test_service(user_repo, session_repo);
    let result = service.update_user(99, UserChanges::default()).await;

    assert!(matches!(result, Err(UserServiceError::NotFound)));
}

#[tokio::test]
async fn test_delete_user_revokes_sessions() {
    let mut user_repo = MockUserRepo::new();
    let mut session_repo = MockSessionRepo::new();

    user_repo
        .expect_delete_user()
        .withf(|id| *id == 4)
        .times(1)
        .returning(|_| Ok(()));
    session_repo
        .expect_delete_sessions_for_user()
        .withf(|id| *id == 4)
        .times(1)
        .returning(|_| Ok(2));

    let service = create_test_service(user_repo, session_repo);
    assert!(service.delete_user(4).await.is_ok());
}

#[tokio::test]
async fn test_delete_missing_user_leaves_sessions_alone() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_delete_user()
        .times(1)
        .returning(|_| Err(UserRepositoryError::NotFound));

    let service = create_test_service(user_repo, session_repo);
    assert!(matches!(
        service.delete_user(4).await,
        Err(UserServiceError::NotFound)
    ));
}

// ==================== SEARCH TESTS ====================

#[tokio::test]
async fn test_search_parses_field() {
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_search_users()
        .withf(|q, field| q == "search_me" && *field == SearchField::All)
        .times(1)
        .returning(|_, _| Ok(vec![user_row(1, "search_me", "h")]));

    let service = create_test_service(user_repo, session_repo);
    let users = service.search_users("search_me", "ALL").await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "search_me");
}

#[tokio::test]
async fn test_search_unknown_field() {
    let user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    let service = create_test_service(user_repo, session_repo);
    let result = service.search_users("x", "phone").await;

    assert!(matches!(result, Err(UserServiceError::InvalidSearchField(f)) if f == "phone"));
}

// ==================== AUTH TESTS ====================

#[tokio::test]
async fn test_login_issues_session() {
    let hash = test_hasher().hash("password123").unwrap();
    let mut user_repo = MockUserRepo::new();
    let mut session_repo = MockSessionRepo::new();

    let stored = user_row(1, "john_doe", &hash);
    user_repo
        .expect_get_user_by_username()
        .withf(|name| name == "john_doe")
        .times(1)
        .returning(move |name| Ok(Some(user_row(1, name, &hash))));
    user_repo
        .expect_get_user()
        .withf(|id| *id == 1)
        .times(1)
        .returning(move |_| Ok(Some(stored.clone())));
    session_repo
        .expect_create_session()
        .withf(|token, user_id| token.starts_with("tok_") && *user_id == 1)
        .times(1)
        .returning(|token, user_id| Ok(session_row(token, user_id)));
    session_repo.expect_delete_session().times(0);

    let service = create_test_service(user_repo, session_repo);
    let session = service.login("John_Doe", "password123").await.unwrap();

    assert_eq!(session.user_id, 1);
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn test_login_discards_session_when_user_deleted_meanwhile() {
    let hash = test_hasher().hash("password123").unwrap();
    let mut user_repo = MockUserRepo::new();
    let mut session_repo = MockSessionRepo::new();

    user_repo
        .expect_get_user_by_username()
        .times(1)
        .returning(move |name| Ok(Some(user_row(5, name, &hash))));
    // Gone by the time the session has been stored.
    user_repo
        .expect_get_user()
        .withf(|id| *id == 5)
        .times(1)
        .returning(|_| Ok(None));
    session_repo
        .expect_create_session()
        .times(1)
        .returning(|token, user_id| Ok(session_row(token, user_id)));
    session_repo
        .expect_delete_session()
        .withf(|token| token.starts_with("tok_"))
        .times(1)
        .returning(|_| Ok(true));

    let service = create_test_service(user_repo, session_repo);
    let result = service.login("john_doe", "password123").await;

    assert!(matches!(result, Err(UserServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let hash = test_hasher().hash("password123").unwrap();
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_get_user_by_username()
        .times(1)
        .returning(move |name| Ok(Some(user_row(1, name, &hash))));

    let service = create_test_service(user_repo, session_repo);
    let result = service.login("john_doe", "nope").await;

    assert!(matches!(result, Err(UserServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_inactive_user() {
    let hash = test_hasher().hash("password123").unwrap();
    let mut user_repo = MockUserRepo::new();
    let session_repo = MockSessionRepo::new();

    user_repo
        .expect_get_user_by_username()
        .times(1)
        .returning(move |name| {
            let mut row = user_row(1, name, &hash);
            row.is_active = false;
            Ok(Some(row))
        });

    let service = create_test_service(user_repo, session_repo);
    let result = service.login("john_doe", "password123").await;

    assert!(matches!(result, Err(UserServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_authenticate_unknown_token() {
    let user_repo = MockUserRepo::new();
    let mut session_repo = MockSessionRepo::new();

    session_repo
        .expect_get_session()
        .times(1)
        .returning(|_| Ok(None));

    let service = create_test_service(user_repo, session_repo);
    let result = service.authenticate_token("tok_missing").await;

    assert!(matches!(result, Err(UserServiceError::InvalidCredentials)));
}

// ==================== STATS TESTS ====================

#[tokio::test]
async fn test_stats_counts_and_details() {
    let mut user_repo = MockUserRepo::new();
    let mut session_repo = MockSessionRepo::new();

    user_repo.expect_get_users().times(2).returning(|| {
        let mut inactive = user_row(2, "bob", "h");
        inactive.is_active = false;
        Ok(vec![user_row(1, "alice", "h"), inactive])
    });
    session_repo
        .expect_get_sessions()
        .times(2)
        .returning(|| Ok(vec![session_row("tok_a", 1)]));

    let service = create_test_service(user_repo, session_repo);

    let summary = service.stats(false).await.unwrap();
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.active_users, 1);
    assert_eq!(summary.inactive_users, 1);
    assert_eq!(summary.active_sessions, 1);
    assert!(summary.details.is_none());

    let detailed = service.stats(true).await.unwrap();
    let details = detailed.details.unwrap();
    assert_eq!(details.user_emails, vec!["alice@example.com", "bob@example.com"]);
    assert_eq!(details.session_tokens, vec!["tok_a"]);
}
