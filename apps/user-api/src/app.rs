use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::MiddlewareConfig;
use crate::methods::create_user::{__path_create_user, create_user};
use crate::methods::delete_user::{__path_delete_user, delete_user};
use crate::methods::entities::{
    CreateUserRequest, DeleteUserResponse, HealthResponse, LoginRequest, LoginResponse,
    RootResponse, StatsResponse, UpdateUserRequest, UserResponse,
};
use crate::methods::get_stats::{__path_get_stats, get_stats};
use crate::methods::get_user_by_id::{__path_get_user_by_id, get_user_by_id};
use crate::methods::get_users::{__path_get_users, get_users};
use crate::methods::health_check::{__path_health_check, health_check};
use crate::methods::login::{__path_login, login};
use crate::methods::root::{__path_root_info, root_info};
use crate::methods::routes::{
    LOGIN_PATH, OPENAPI_JSON_PATH, ROOT_PATH, SERVICE_DOCS_PATH, SERVICE_HEALTH_PATH, STATS_PATH,
    USERS_BY_ID_PATH, USERS_PATH, USERS_SEARCH_PATH,
};
use crate::methods::search_users::{__path_search_users, search_users};
use crate::methods::update_user::{__path_update_user, update_user};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "User Management API", version = "1.0.0"),
    paths(
        root_info, health_check, get_stats,
        create_user, get_user_by_id, get_users, update_user, delete_user, search_users,
        login
    ),
    components(schemas(
        CreateUserRequest, UpdateUserRequest, UserResponse, DeleteUserResponse,
        LoginRequest, LoginResponse, StatsResponse, RootResponse, HealthResponse
    )),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "sessions", description = "Login and session tokens"),
        (name = "service", description = "Service info, health and statistics")
    )
)]
pub struct ApiDoc;

/// All routes with state attached, without any middleware.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(USERS_PATH, get(get_users).post(create_user))
        .route(USERS_SEARCH_PATH, get(search_users))
        .route(
            USERS_BY_ID_PATH,
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
        .route(LOGIN_PATH, post(login));

    let service_routes = Router::new()
        .route(ROOT_PATH, get(root_info))
        .route(SERVICE_HEALTH_PATH, get(health_check))
        .route(STATS_PATH, get(get_stats))
        .merge(SwaggerUi::new(SERVICE_DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()));

    Router::new()
        .merge(user_routes)
        .merge(service_routes)
        .with_state(state)
}

// ============================================
// Middleware stack (applied inner to outer)
// Order: Request → Timeout → CORS → Body Limit → Request ID → Trace → Handler
// Rate limiting needs peer addresses and is added by the binary.
// ============================================
pub fn with_middleware(mut app: Router, config: &MiddlewareConfig) -> Router {
    // 1. Trace layer (innermost - closest to handler)
    app = app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
    );

    // 2. Request ID layers
    let x_request_id = HeaderName::from_static("x-request-id");
    app = app
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid));

    // 3. Body limit layer
    app = app.layer(RequestBodyLimitLayer::new(config.max_body_size));

    // 4. CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION, x_request_id];
    let cors_layer = if config.allows_any_origin() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };
    app = app.layer(cors_layer.allow_methods(methods).allow_headers(headers));

    // 5. Timeout layer (returns 408 Request Timeout)
    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ))
}
