//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::feedback::FeedbackPipeline;
use crate::kernel::ServerDeps;
use crate::server::routes::{analyze_handler, health_handler, test_handler, welcome_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
    pub pipeline: Arc<FeedbackPipeline>,
}

/// CORS for the browser form. `*` allows any origin; unparseable origins are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the Axum application router
///
/// Dependencies are constructed by the caller (main or tests) and shared
/// read-only across requests.
pub fn build_app(server_deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
        pipeline: Arc::new(FeedbackPipeline::standard()),
    };

    Router::new()
        .route("/", get(welcome_handler))
        .route("/test", get(test_handler))
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
