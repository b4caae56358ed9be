use axum::Json;
use crate::error::{handle_service_error, ApiError};
use crate::extract::ApiQuery;
use crate::methods::entities::{SearchQuery, UserResponse};
use crate::state::AppState;
use crate::methods::routes::USERS_SEARCH_PATH;

#[utoipa::path(
    get,
    path = USERS_SEARCH_PATH,
    tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users in creation order", body = Vec<UserResponse>),
        (status = 400, description = "Missing query or unknown search field"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn search_users(
    axum::extract::State(state): axum::extract::State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let field = query.field.as_deref().unwrap_or("all");

    state
        .user_service
        .search_users(&query.q, field)
        .await
        .map(|users| Json(users.into_iter().map(UserResponse::from).collect()))
        .map_err(|e| handle_service_error(e, &state.env, "search_users"))
}
