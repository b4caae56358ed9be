use axum::Json;
use crate::auth::DeleteAuthorization;
use crate::error::{handle_service_error, ApiError};
use crate::methods::entities::DeleteUserResponse;
use crate::methods::parse_user_id;
use crate::state::AppState;
use crate::methods::routes::USERS_BY_ID_PATH;

#[utoipa::path(
    delete,
    path = USERS_BY_ID_PATH,
    tag = "users",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = DeleteUserResponse),
        (status = 400, description = "Invalid user id"),
        (status = 401, description = "Missing or invalid bearer token / basic credentials"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn delete_user(
    axum::extract::Path(id): axum::extract::Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
    auth: DeleteAuthorization,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;

    tracing::info!(
        actor_id = auth.user_id(),
        scheme = auth.scheme(),
        target_id = user_id,
        "delete requested"
    );

    state.user_service
        .delete_user(user_id)
        .await
        .map(|_| {
            Json(DeleteUserResponse {
                message: "user deleted".to_string(),
                id: user_id,
            })
        })
        .map_err(|e| handle_service_error(e, &state.env, "delete_user"))
}
