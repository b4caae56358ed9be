use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use user_lib::errors_service::UserServiceError;
use validator::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl ApiError {
    pub fn invalid_user_id() -> Self {
        ApiError::BadRequest("invalid user id".to_string())
    }

    pub fn user_not_found() -> Self {
        ApiError::NotFound("user not found".to_string())
    }

    pub fn missing_credentials() -> Self {
        ApiError::Unauthorized("missing authorization header".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("invalid credentials".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", Some(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg)),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", Some(msg)),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", Some(msg)),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(msg) => ApiError::BadRequest(msg),
            UserServiceError::NotFound => ApiError::user_not_found(),
            UserServiceError::UsernameAlreadyExists => ApiError::BadRequest("username already exists".to_string()),
            UserServiceError::InvalidSearchField(field) => ApiError::BadRequest(format!(
                "invalid search field '{field}', expected one of: username, email, all"
            )),
            UserServiceError::InvalidCredentials => ApiError::invalid_credentials(),
            UserServiceError::Internal(err) => ApiError::Internal(err.to_string()),
            _ => ApiError::Internal("unexpected error".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

/// Check if environment is production-like (prod, prod01, prod02, etc.)
pub fn is_prod_like(env: &str) -> bool {
    env.to_lowercase().starts_with("prod")
}

/// Converts a service error to an ApiError, logging internal errors.
/// In production, internal error details are hidden.
pub fn handle_service_error(err: UserServiceError, env: &str, operation: &str) -> ApiError {
    match &err {
        UserServiceError::Internal(_) => {
            tracing::error!(env = %env, error = ?err, operation = %operation, "service error");
            if is_prod_like(env) {
                ApiError::Internal("internal server error".to_string())
            } else {
                ApiError::from(err)
            }
        }
        _ => ApiError::from(err),
    }
}
