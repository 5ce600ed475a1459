//! Router configuration for the annotation image server.
//!
//! # Route Structure
//!
//! ```text
//! /hello/                    - Liveness probe
//! /annotation-image/         - First discovered image
//! /annotation-image/{name}   - Specific image
//! /available-images/         - Image listing
//! /debug/                    - Diagnostics (only when enabled)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use annotation_server::server::{create_router, RouterConfig};
//! use annotation_server::store::ImageStore;
//!
//! let store = ImageStore::new("/srv/app");
//! let router = create_router(store, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    available_images_handler, debug_info_handler, default_image_handler, hello_handler,
    named_image_handler, AppState,
};
use crate::store::ImageStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for image responses
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Whether to mount the /debug/ endpoint
    pub debug_enabled: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults:
    /// CORS allows any origin, cache max-age is 1 hour, tracing is enabled,
    /// and the debug endpoint is not mounted.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: 3600,
            enable_tracing: true,
            debug_enabled: false,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Mount or omit the /debug/ endpoint.
    ///
    /// The endpoint reports absolute filesystem paths over the network, so
    /// leave it disabled on externally reachable deployments.
    pub fn with_debug_endpoint(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with the image endpoints, CORS
/// configuration, and optional request tracing. The debug endpoint is not
/// part of the router at all unless enabled.
pub fn create_router(store: ImageStore, config: RouterConfig) -> Router {
    let state = AppState::with_cache_max_age(store, config.cache_max_age);

    let mut router = Router::new()
        .route("/hello/", get(hello_handler))
        .route("/annotation-image/", get(default_image_handler))
        .route("/annotation-image/{name}", get(named_image_handler))
        .route("/available-images/", get(available_images_handler));

    if config.debug_enabled {
        router = router.route("/debug/", get(debug_info_handler));
    }

    let router = router.with_state(state).layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
