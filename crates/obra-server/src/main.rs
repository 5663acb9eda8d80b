//! obra server
//!
//! Wires configuration, the PostgreSQL store, the optional hosted media store
//! and the web routes into one HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obra_core::config::AppConfig;
use obra_db::{schema, Database, DatabaseConfig, PgStore, Store};
use obra_media::{HostedMediaStore, MediaStore};
use obra_web::AppState;

mod health;

use health::{HealthChecker, HealthConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = load_config(|key| std::env::var(key).ok())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        hosted_media = config.uses_hosted_media(),
        "Starting {}",
        config.instance.app_title
    );

    let db = Database::connect(&DatabaseConfig::from(&config.database))
        .await
        .context("Failed to connect to database")?;
    schema::ensure_schema(db.pool())
        .await
        .context("Failed to prepare database schema")?;
    info!("Connected to database");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(db.clone()));
    let media: Option<Arc<dyn MediaStore>> = match &config.media {
        Some(media_config) => {
            let hosted: Arc<dyn MediaStore> = Arc::new(
                HostedMediaStore::new(media_config.clone())
                    .context("Failed to build media store client")?,
            );
            Some(hosted)
        }
        None => None,
    };

    let app = build_app(store, media, config.clone());

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
/// Read the configuration; any invalid or incomplete variable aborts startup
fn load_config<F>(lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    AppConfig::from_lookup(lookup).context("Invalid configuration")
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,obra_server=debug,obra_web=debug,obra_services=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_app(
    store: Arc<dyn Store>,
    media: Option<Arc<dyn MediaStore>>,
    config: AppConfig,
) -> Router {
    let health = Arc::new(
        HealthChecker::new(HealthConfig::default(), store.clone())
            .with_hosted_media(media.is_some()),
    );

    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    let mut state = AppState::new(store, config);
    if let Some(media) = media {
        state = state.with_media(media);
    }

    Router::new()
        .merge(health_routes)
        .merge(obra_web::app(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use obra_db::MemoryStore;
    use tower::ServiceExt;

    fn test_app(store: Arc<MemoryStore>) -> Router {
        build_app(store, None, AppConfig::default())
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_bad_variable_aborts_config() {
        let err = load_config(vars(&[
            ("DATABASE_URL", "postgres://obra@db/obras"),
            ("PORT", "80a"),
        ]))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("PORT"));

        let err = load_config(vars(&[
            ("DATABASE_URL", "postgres://obra@db/obras"),
            ("MEDIA_UPLOAD_URL", "https://media.example/upload"),
        ]))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("MEDIA_API_KEY"));
    }

    #[test]
    fn test_valid_config_keeps_database_url() {
        let config = load_config(vars(&[("DATABASE_URL", "postgres://obra@db/obras")])).unwrap();
        assert_eq!(config.database.url, "postgres://obra@db/obras");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(status_of(test_app(store.clone()), "/health").await, StatusCode::OK);
        assert_eq!(status_of(test_app(store.clone()), "/health/live").await, StatusCode::OK);
        assert_eq!(status_of(test_app(store), "/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_fails_without_store() {
        let store = Arc::new(MemoryStore::new());
        store.set_available(false);

        assert_eq!(
            status_of(test_app(store.clone()), "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(test_app(store), "/health/live").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_web_routes_mounted() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(status_of(test_app(store.clone()), "/").await, StatusCode::OK);
        assert_eq!(status_of(test_app(store), "/dashboard").await, StatusCode::OK);
    }
}
