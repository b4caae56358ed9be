use axum::Json;
use secrecy::ExposeSecret;
use crate::error::{handle_service_error, ApiError};
use crate::extract::ApiJson;
use crate::methods::entities::{LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::methods::routes::LOGIN_PATH;

#[utoipa::path(
    post,
    path = LOGIN_PATH,
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn login(
    axum::extract::State(state): axum::extract::State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    state
        .user_service
        .login(&payload.username, payload.password.expose_secret())
        .await
        .map(|session| Json(LoginResponse::from(session)))
        .map_err(|e| {
            tracing::warn!(username = %payload.username, "login failed");
            handle_service_error(e, &state.env, "login")
        })
}
