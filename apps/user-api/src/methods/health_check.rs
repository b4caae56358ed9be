use axum::Json;
use crate::methods::entities::HealthResponse;
use crate::methods::routes::SERVICE_HEALTH_PATH;

#[utoipa::path(
    get,
    path = SERVICE_HEALTH_PATH,
    tag = "service",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
