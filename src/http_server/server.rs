//! # HTTP Server
//!
//! Thin REST binding of the content service. The actor identity arrives
//! already resolved in the `x-actor-id` header; ownership checks happen in
//! the handlers using data the service returns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::article_routes::article_routes;
use super::observability_routes::observability_routes;
use super::report_routes::report_routes;
use super::user_routes::user_routes;
use crate::config::ServiceConfig;
use crate::observability::{log_event, Event};
use crate::service::ContentService;

/// HTTP server for the content service
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(service: Arc<ContentService>, config: ServiceConfig) -> Self {
        let router = Self::build_router(service, &config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(service: Arc<ContentService>, config: &ServiceConfig) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
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
            .merge(observability_routes(Arc::clone(&service)))
            .merge(article_routes(Arc::clone(&service)))
            .merge(user_routes(Arc::clone(&service)))
            .merge(report_routes(service))
            .layer(TraceLayer::new_for_http())
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

    /// Serve until the listener fails
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = addr.to_string();
        log_event(Event::ServerStart, &[("addr", bound.as_str())]);

        let result = axum::serve(listener, self.router).await;
        log_event(Event::ServerStop, &[("addr", bound.as_str())]);
        result
    }
}
