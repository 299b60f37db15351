//! Dimension Tracker Web Server
//!
//! Serves the measurement form, records submissions and shows running
//! averages with derived area and volume.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
mod error;
pub mod routes;
mod summary;
mod view;

pub use config::{AppConfig, LogFormat, ServerConfig, StoreKind};
pub use error::ApiError;
pub use summary::MeasurementSummary;
pub use view::{IndexPage, Templates};

use data_validator::Validator;
use storage::{MeasurementStore, MemoryRepository, PgRepository};

/// Application state shared across handlers
pub struct AppState {
    /// Measurement store
    pub store: Arc<dyn MeasurementStore>,
    pub validator: Validator,
    pub templates: Templates,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state over the given store
    pub fn new(store: Arc<dyn MeasurementStore>) -> Result<Self, ApiError> {
        Ok(Self {
            store,
            validator: Validator::new(),
            templates: Templates::new()?,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(routes::measurements::show_index).post(routes::measurements::submit_measurement),
        )
        .route("/health", get(routes::health::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging; `RUST_LOG` overrides the default filter
pub fn init_logging(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

/// Build the configured measurement store
pub async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn MeasurementStore>> {
    match (config.server.store, &config.database) {
        (StoreKind::Memory, _) => Ok(Arc::new(MemoryRepository::new())),
        (StoreKind::Postgres, Some(db)) => {
            let repo = PgRepository::new(db)?;
            if let Err(e) = repo.ensure_schema().await {
                warn!(error = %e, "Could not ensure measurements table exists");
            }
            Ok(Arc::new(repo))
        }
        (StoreKind::Postgres, None) => anyhow::bail!("PostgreSQL store selected without database settings"),
    }
}

/// Run the server until it is shut down
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let store = build_store(&config).await?;
    let state = Arc::new(AppState::new(store)?);
    let app = create_router(state);

    info!("Starting web server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::measurements::{CONNECTIVITY_MESSAGE, INVALID_VALUE_MESSAGE};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use storage::{Averages, Dimension, Measurement, StorageError};
    use tower::ServiceExt;

    /// Store whose reads succeed but whose writes always fail
    struct ReadOnlyStore {
        inner: MemoryRepository,
    }

    #[async_trait]
    impl MeasurementStore for ReadOnlyStore {
        async fn insert(&self, _measurement: &Measurement) -> Result<(), StorageError> {
            Err(StorageError::ConnectionFailed {
                attempts: 5,
                message: "connection refused".to_string(),
            })
        }

        async fn averages(&self) -> Result<Averages, StorageError> {
            self.inner.averages().await
        }
    }

    /// Store that is completely unreachable
    struct DownStore;

    #[async_trait]
    impl MeasurementStore for DownStore {
        async fn insert(&self, _measurement: &Measurement) -> Result<(), StorageError> {
            Err(StorageError::DatabaseError("down".to_string()))
        }

        async fn averages(&self) -> Result<Averages, StorageError> {
            Err(StorageError::DatabaseError("down".to_string()))
        }
    }

    fn app_with(store: Arc<dyn MeasurementStore>) -> Router {
        create_router(Arc::new(AppState::new(store).unwrap()))
    }

    async fn get_index(app: &Router) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        into_parts(response).await
    }

    async fn post_form(app: &Router, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn into_parts(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn cell(id: &str, value: &str) -> String {
        format!("<td id=\"{id}\">{value}</td>")
    }

    #[tokio::test]
    async fn test_index_with_no_rows_shows_zeros() {
        let app = app_with(Arc::new(MemoryRepository::new()));
        let (status, html) = get_index(&app).await;

        assert_eq!(status, StatusCode::OK);
        for id in ["length", "width", "height", "area", "volume"] {
            assert!(html.contains(&cell(id, "0.000")));
        }
    }

    #[tokio::test]
    async fn test_submission_redirects_and_updates_averages() {
        let app = app_with(Arc::new(MemoryRepository::new()));

        let response = post_form(&app, "dimension=length&value=2%2C5").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = post_form(&app, "dimension=width&value=2.0").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let (status, html) = get_index(&app).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(&cell("length", "2.500")));
        assert!(html.contains(&cell("width", "2.000")));
        assert!(html.contains(&cell("height", "0.000")));
        assert!(html.contains(&cell("area", "5.000")));
        assert!(html.contains(&cell("volume", "0.000")));
    }

    #[tokio::test]
    async fn test_volume_from_all_three_averages() {
        let app = app_with(Arc::new(MemoryRepository::new()));
        for body in [
            "dimension=length&value=2",
            "dimension=length&value=3",
            "dimension=width&value=1%2C5",
            "dimension=height&value=4",
        ] {
            assert_eq!(post_form(&app, body).await.status(), StatusCode::SEE_OTHER);
        }

        let (_, html) = get_index(&app).await;
        assert!(html.contains(&cell("length", "2.500")));
        assert!(html.contains(&cell("area", "3.750")));
        assert!(html.contains(&cell("volume", "15.000")));
    }

    #[tokio::test]
    async fn test_negative_value_rejected_without_write() {
        let repo = Arc::new(MemoryRepository::new());
        let app = app_with(repo.clone());

        assert_eq!(
            post_form(&app, "dimension=length&value=4").await.status(),
            StatusCode::SEE_OTHER
        );

        let (status, html) = into_parts(post_form(&app, "dimension=length&value=-1").await).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains(INVALID_VALUE_MESSAGE));
        assert!(html.contains(&cell("length", "4.000")));
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_and_missing_values_rejected() {
        let repo = Arc::new(MemoryRepository::new());
        let app = app_with(repo.clone());

        for body in ["dimension=width&value=abc", "dimension=width&value=0", "dimension=width"] {
            let (status, html) = into_parts(post_form(&app, body).await).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
            assert!(html.contains(INVALID_VALUE_MESSAGE));
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_dimension_rejected() {
        let repo = Arc::new(MemoryRepository::new());
        let app = app_with(repo.clone());

        let (status, html) = into_parts(post_form(&app, "dimension=depth&value=3").await).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Unknown dimension"));
        assert!(repo.values(Dimension::Length).is_empty());
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_shows_current_averages() {
        let inner = MemoryRepository::new();
        inner
            .insert(&Measurement {
                dimension: Dimension::Height,
                value: "1.5".parse().unwrap(),
            })
            .await
            .unwrap();
        let app = app_with(Arc::new(ReadOnlyStore { inner }));

        let (status, html) = into_parts(post_form(&app, "dimension=height&value=9").await).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(html.contains(CONNECTIVITY_MESSAGE));
        assert!(html.contains(&cell("height", "1.500")));
    }

    #[tokio::test]
    async fn test_unreachable_store_still_renders_page() {
        let app = app_with(Arc::new(DownStore));
        let (status, html) = get_index(&app).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(&cell("area", "0.000")));
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(DownStore));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (status, body) = into_parts(response).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_memory_store_from_config() {
        let config = AppConfig {
            server: ServerConfig {
                store: StoreKind::Memory,
                ..ServerConfig::default()
            },
            database: None,
        };
        let store = build_store(&config).await.unwrap();
        assert!(store.averages().await.unwrap().is_empty());
    }
}
