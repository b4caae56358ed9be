use axum::Json;
use secrecy::ExposeSecret;
use user_lib::entities::UserChanges;
use validator::Validate;
use crate::auth::BearerSession;
use crate::error::{handle_service_error, ApiError};
use crate::extract::ApiJson;
use crate::methods::entities::{UpdateUserRequest, UserResponse};
use crate::methods::parse_user_id;
use crate::state::AppState;
use crate::methods::routes::USERS_BY_ID_PATH;

#[utoipa::path(
    put,
    path = USERS_BY_ID_PATH,
    tag = "users",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid user id or validation error"),
        (status = 401, description = "Missing or unknown bearer token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn update_user(
    axum::extract::Path(id): axum::extract::Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
    BearerSession(session): BearerSession,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    payload.validate()?;

    // The token is not scoped to its owner; any session may update any user.
    if session.user_id != user_id {
        tracing::warn!(
            actor_id = session.user_id,
            target_id = user_id,
            "user updated with another user's session"
        );
    }

    let changes = UserChanges {
        email: payload.email,
        age: payload.age,
        is_active: payload.is_active,
        password: payload.password.map(|p| p.expose_secret().to_string()),
    };
    if changes.password.as_deref() == Some("") {
        return Err(ApiError::BadRequest("password cannot be empty".to_string()));
    }

    state.user_service
        .update_user(user_id, changes)
        .await
        .map(|user| Json(UserResponse::from(user)))
        .map_err(|e| handle_service_error(e, &state.env, "update_user"))
}
