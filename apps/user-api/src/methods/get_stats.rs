use axum::Json;
use crate::error::{handle_service_error, ApiError};
use crate::extract::ApiQuery;
use crate::methods::entities::{StatsQuery, StatsResponse};
use crate::state::AppState;
use crate::methods::routes::STATS_PATH;

/// Aggregate user and session counts.
///
/// With `include_details=true` the response also lists every user email and
/// every live session token. No authentication is required for either form.
#[utoipa::path(
    get,
    path = STATS_PATH,
    tag = "service",
    params(StatsQuery),
    responses(
        (status = 200, description = "User and session statistics", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_stats(
    axum::extract::State(state): axum::extract::State<AppState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let include_details = query.include_details.unwrap_or(false);

    state
        .user_service
        .stats(include_details)
        .await
        .map(|stats| Json(StatsResponse::from(stats)))
        .map_err(|e| handle_service_error(e, &state.env, "stats"))
}
