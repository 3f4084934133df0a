//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.
//!
//! The storage pool is handed in already open and is closed here once the
//! server has drained after a shutdown signal.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::ingest::IngestConfig;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::GradeStore;

use super::config::HttpServerConfig;
use super::grades_routes::{grades_routes, GradesState};
use super::observability_routes::{health_routes, ready_routes};

/// HTTP server for the grades API and front-end
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
    store: Arc<dyn GradeStore>,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, store: Arc<dyn GradeStore>, ingest: IngestConfig) -> Self {
        let router = Self::build_router(&config, store.clone(), ingest);
        Self {
            config,
            router,
            store,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &HttpServerConfig,
        store: Arc<dyn GradeStore>,
        ingest: IngestConfig,
    ) -> Router {
        let grades_state = Arc::new(GradesState::new(store.clone(), ingest));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // /health and the / redirect
            .merge(health_routes())
            .merge(ready_routes(store))
            // Upload and reports
            .merge(grades_routes(grades_state))
            // Bundled front-end
            .nest_service("/static", ServeDir::new(&config.static_dir))
            .layer(DefaultBodyLimit::max(config.max_upload_bytes))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C, then close the storage pool
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(
            Event::Serving,
            &[
                ("addr", &addr.to_string()),
                ("static_dir", &self.config.static_dir),
            ],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.store.close().await;
        log_event(Event::ShutdownComplete);

        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    log_event(Event::ShutdownStart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryGradeStore;

    fn server(config: HttpServerConfig) -> HttpServer {
        HttpServer::new(
            config,
            Arc::new(MemoryGradeStore::new()),
            IngestConfig::default(),
        )
    }

    #[test]
    fn test_server_creation() {
        let server = server(HttpServerConfig::default());
        assert_eq!(server.socket_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = server(HttpServerConfig::with_port(8080));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = server(config).router();
    }
}
