use axum::Json;
use crate::error::{handle_service_error, ApiError};
use crate::methods::entities::UserResponse;
use crate::methods::parse_user_id;
use crate::state::AppState;
use crate::methods::routes::USERS_BY_ID_PATH;

#[utoipa::path(
    get,
    path = USERS_BY_ID_PATH,
    tag = "users",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_user_by_id(
    axum::extract::Path(id): axum::extract::Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;

    state.user_service
        .get_user(user_id)
        .await
        .map_err(|e| handle_service_error(e, &state.env, "get_user"))?
        .map(|user| Json(UserResponse::from(user)))
        .ok_or_else(ApiError::user_not_found)
}
