// Service info
pub const ROOT_PATH: &str = "/";
pub const SERVICE_HEALTH_PATH: &str = "/health";
pub const STATS_PATH: &str = "/stats";

// Users
pub const USERS_PATH: &str = "/users";
pub const USERS_SEARCH_PATH: &str = "/users/search";
pub const USERS_BY_ID_PATH: &str = "/users/{id}";

// Sessions
pub const LOGIN_PATH: &str = "/login";

// Docs
pub const SERVICE_DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";
