use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use user_api::app::{router, with_middleware};
use user_api::config::{MiddlewareConfig, ServerConfig};
use user_api::constants::{LOCAL_ENV, SERVICE, SERVICE_VERSION};
use user_api::shutdown::{drain_deadline, shutdown_signal};
use user_api::state::AppState;
use user_lib::auth::{CredentialHasher, HashingConfig};
use user_lib::seeduser::{initialize_seed_user, SeedUserConfig};
use user_lib::user_service::UserService;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(env: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    if env == LOCAL_ENV {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .pretty();
        registry.with(json_layer).with(pretty_layer).init();
    } else {
        registry.with(json_layer).init();
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.env);

    tracing::info!(
        service = SERVICE,
        version = SERVICE_VERSION,
        env = %server_config.env,
        "tracing initialized"
    );

    let middleware_config = MiddlewareConfig::from_env();
    tracing::info!(
        rate_limit_per_minute = middleware_config.rate_limit_per_minute,
        rate_limit_burst = middleware_config.rate_limit_burst,
        request_timeout_secs = middleware_config.request_timeout.as_secs(),
        max_body_size = middleware_config.max_body_size,
        cors_origins = ?middleware_config.cors_allowed_origins,
        "middleware configuration loaded"
    );

    let hashing_config = HashingConfig::from_env();
    let hasher = CredentialHasher::new(hashing_config)?;
    let user_service = UserService::new(hasher);

    // Bootstrap: the seed account must exist before the first request is served
    let seed_config = SeedUserConfig::from_env()?;
    let seed_user = initialize_seed_user(&user_service, &seed_config).await?;
    tracing::info!(user_id = seed_user.id, username = %seed_user.username, "seed user ready");

    let app_state = AppState::new(user_service, server_config.env.clone());
    let mut app = with_middleware(router(app_state), &middleware_config);

    // Rate limiting layer (outermost)
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(middleware_config.replenish_interval_ms())
            .burst_size(middleware_config.rate_limit_burst)
            .finish()
            .ok_or("failed to build rate limiter configuration")?,
    );
    app = app.layer(GovernorLayer {
        config: governor_conf,
    });

    let addr = server_config.bind_addr();
    let public_url = format!("http://127.0.0.1:{}", server_config.port);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("user-api is ready to accept requests at: {}", public_url);
    tracing::info!("API docs available at: {}/docs", public_url);

    let (shutdown_started, shutdown_rx) = oneshot::channel();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_started.send(());
    })
    .into_future();

    tokio::select! {
        result = server => result.map_err(|e| format!("Server error: {}", e))?,
        _ = drain_deadline(shutdown_rx, middleware_config.shutdown_timeout) => {
            tracing::warn!(
                timeout_secs = middleware_config.shutdown_timeout.as_secs(),
                "shutdown timeout elapsed, dropping in-flight requests"
            );
        }
    }

    Ok(())
}
