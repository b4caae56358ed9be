use axum::Json;
use crate::error::{handle_service_error, ApiError};
use crate::extract::ApiQuery;
use crate::methods::entities::{PaginationQuery, UserResponse};
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    get,
    path = USERS_PATH,
    tag = "users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users in creation order", body = Vec<UserResponse>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_users(
    axum::extract::State(state): axum::extract::State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    state
        .user_service
        .get_users(pagination.into())
        .await
        .map(|users| Json(users.into_iter().map(UserResponse::from).collect()))
        .map_err(|e| handle_service_error(e, &state.env, "get_users"))
}
