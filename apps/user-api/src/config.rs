use std::time::Duration;

use crate::constants::{
    CORS_ALLOWED_ORIGINS, DEFAULT_PORT, ENV, LOCAL_ENV, MAX_BODY_SIZE_BYTES, RATE_LIMIT_BURST,
    RATE_LIMIT_PER_MINUTE, REQUEST_TIMEOUT_SECS, SHUTDOWN_TIMEOUT_SECS, USER_API_PORT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub env: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            env: LOCAL_ENV.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let env = std::env::var(ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default.env);

        let port = match std::env::var(USER_API_PORT) {
            Ok(v) => v.parse().unwrap_or_else(|_| {
                tracing::warn!(env_var = USER_API_PORT, value = %v, "invalid port, using default");
                default.port
            }),
            Err(_) => default.port,
        };

        Self { env, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub request_timeout: Duration,
    pub max_body_size: usize,
    pub shutdown_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 600,
            rate_limit_burst: 100,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1_048_576, // 1MB
            shutdown_timeout: Duration::from_secs(30),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl MiddlewareConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let rate_limit_per_minute = std::env::var(RATE_LIMIT_PER_MINUTE)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v > 0)
            .unwrap_or(default.rate_limit_per_minute);

        let rate_limit_burst = std::env::var(RATE_LIMIT_BURST)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v > 0)
            .unwrap_or(default.rate_limit_burst);

        let request_timeout = std::env::var(REQUEST_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default.request_timeout);

        let max_body_size = std::env::var(MAX_BODY_SIZE_BYTES)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.max_body_size);

        let shutdown_timeout = std::env::var(SHUTDOWN_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default.shutdown_timeout);

        let cors_allowed_origins = std::env::var(CORS_ALLOWED_ORIGINS)
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(default.cors_allowed_origins);

        Self {
            rate_limit_per_minute,
            rate_limit_burst,
            request_timeout,
            max_body_size,
            shutdown_timeout,
            cors_allowed_origins,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }

    /// Interval at which the rate limiter hands out a new request permit.
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / u64::from(self.rate_limit_per_minute.max(1))).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middleware_defaults() {
        let config = MiddlewareConfig::default();
        assert!(config.allows_any_origin());
        assert_eq!(config.replenish_interval_ms(), 100);
    }

    #[test]
    fn test_replenish_interval_never_reaches_zero() {
        let config = MiddlewareConfig {
            rate_limit_per_minute: 1_000_000,
            ..MiddlewareConfig::default()
        };
        assert_eq!(config.replenish_interval_ms(), 1);
    }

    #[test]
    fn test_explicit_origins() {
        let config = MiddlewareConfig {
            cors_allowed_origins: vec!["https://example.com".to_string()],
            ..MiddlewareConfig::default()
        };
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.env, "local");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }
}
