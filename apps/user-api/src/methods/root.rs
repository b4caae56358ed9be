use axum::Json;
use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use crate::methods::entities::RootResponse;
use crate::methods::routes::ROOT_PATH;

#[utoipa::path(
    get,
    path = ROOT_PATH,
    tag = "service",
    responses(
        (status = 200, description = "Service name and version", body = RootResponse),
    )
)]
pub async fn root_info() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
    })
}
