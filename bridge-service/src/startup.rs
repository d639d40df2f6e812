//! Application startup and lifecycle management.

use crate::config::{BridgeConfig, HttpConfig};
use crate::handlers::{
    analyze::analyze_image,
    health::{analyze_health, health_check},
    method_not_allowed,
};
use crate::services::remote::{GradioBackend, InferenceBackend};
use crate::services::AnalysisService;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{cors_layer, http_trace_layer, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Build the HTTP router with CORS, body limit and request tracing.
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .route(
            "/analyze",
            get(analyze_health)
                .post(analyze_image)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(cors_layer(
            &http.allowed_origins,
            &[Method::GET, Method::POST, Method::OPTIONS],
        ))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the configured Gradio endpoint.
    pub async fn build(config: BridgeConfig) -> Result<Self, AppError> {
        let backend = GradioBackend::new(&config.remote).map_err(|e| {
            tracing::error!("Failed to create remote client: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            endpoint = %backend.endpoint(),
            timeout_secs = config.remote.timeout.as_secs(),
            "Initialized Gradio backend"
        );

        Self::build_with_backend(config, Arc::new(backend)).await
    }

    /// Build the application with an explicit backend (used by tests).
    pub async fn build_with_backend(
        config: BridgeConfig,
        backend: Arc<dyn InferenceBackend>,
    ) -> Result<Self, AppError> {
        let analyzer = AnalysisService::new(backend, config.policy);
        let policy = analyzer.policy();
        let state = AppState::new(config.service_name.as_str(), analyzer);
        let router = build_router(state, &config.http);

        // Port 0 = random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            ?policy,
            "Bridge service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
