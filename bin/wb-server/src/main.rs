//! Wallboard Server
//!
//! REST APIs for the wallboard auth core:
//! - Login APIs: simple (code only), secure (agent/supervisor code), logout
//! - Admin APIs: user/agent management
//! - Health and OpenAPI docs
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WALLBOARD_CONFIG` | - | Path to a TOML config file |
//! | `WALLBOARD_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `WALLBOARD_HTTP_PORT` | `3001` | HTTP API port |
//! | `WALLBOARD_CORS_ORIGINS` | - | Comma-separated allowed origins (any when empty) |
//! | `WALLBOARD_DATABASE_URL` | `sqlite://./data/wallboard.db` | SQLite database URL |
//! | `WALLBOARD_DATABASE_MAX_CONNECTIONS` | `5` | Pool size |
//! | `WALLBOARD_JWT_SECRET` / `JWT_SECRET` | - | Session token signing secret (required) |
//! | `WALLBOARD_JWT_ISSUER` | `wallboard` | Session token issuer claim |
//! | `WALLBOARD_DEV_MODE` | `false` | Seed the dev roster on startup |
//! | `LOG_FORMAT` | `text` | `json` for structured logs |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{http::HeaderValue, response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use wb_config::{ConfigLoader, HttpConfig};
use wb_platform::{
    auth_router, db, users_router, AuthService, AuthState, DevDataSeeder, SessionTokenIssuer,
    SqliteUserRepository, UserRepository, UsersState,
};

#[tokio::main]
async fn main() -> Result<()> {
    wb_common::logging::init_logging("wb-server");

    info!("Starting Wallboard Server");

    // Fails fast when no signing secret is configured
    let config = ConfigLoader::new().load()?;

    info!("Connecting to database: {}", config.database.url);
    let pool = db::connect(&config.database.url, config.database.max_connections).await?;

    let repo = SqliteUserRepository::new(pool.clone());
    repo.init_schema().await?;

    if config.dev_mode {
        let seeder = DevDataSeeder::new(SqliteUserRepository::new(pool.clone()));
        if let Err(e) = seeder.seed().await {
            warn!("Dev data seeding skipped: {}", e);
        }
    }

    let user_repo: Arc<dyn UserRepository> = Arc::new(repo);
    let token_issuer = Arc::new(SessionTokenIssuer::new(
        config.jwt_secret()?,
        config.auth.issuer.clone(),
    )?);
    let auth_service = Arc::new(AuthService::new(user_repo.clone(), token_issuer));

    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/auth", auth_router(AuthState::new(auth_service)))
        .nest("/api/users", users_router(UsersState::new(user_repo)))
        .split_for_parts();

    openapi.info.title = "Wallboard API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Login and user administration for the wallboard".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received, closing database pool...");
    pool.close().await;

    info!("Wallboard Server shutdown complete");
    Ok(())
}

fn cors_layer(http: &HttpConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = http
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
