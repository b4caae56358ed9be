use axum::{http::StatusCode, Json};
use crate::extract::ApiJson;
use secrecy::ExposeSecret;
use user_lib::entities::NewUser;
use validator::Validate;
use crate::error::{handle_service_error, ApiError};
use crate::methods::entities::{CreateUserRequest, UserResponse};
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    post,
    path = USERS_PATH,
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation error or username already exists"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_user(
    axum::extract::State(state): axum::extract::State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate()?;
    if payload.password.expose_secret().is_empty() {
        return Err(ApiError::BadRequest("password cannot be empty".to_string()));
    }

    state
        .user_service
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            password: payload.password.expose_secret().to_string(),
            age: payload.age,
        })
        .await
        .map(|user| (StatusCode::CREATED, Json(UserResponse::from(user))))
        .map_err(|e| handle_service_error(e, &state.env, "create_user"))
}
