//! Annotation image server binary.
//!
//! Parses configuration, initializes logging, and starts the HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annotation_server::{
    config::Config,
    server::{create_router, RouterConfig},
    store::ImageStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Base directory: {}", config.base_dir.display());
    if let Some(ref dir) = config.data_dir {
        info!("  Data directory: {} (explicit)", dir.display());
    } else {
        info!("  Data directory: discovered from candidates");
    }
    info!("  Cache max-age: {}s", config.cache_max_age);

    if config.debug_endpoint {
        warn!("  Debug endpoint: ENABLED - /debug/ exposes filesystem paths");
    }

    // Build the image store
    let mut store = ImageStore::new(&config.base_dir);
    if let Some(ref dir) = config.data_dir {
        store = store.with_data_dir(dir);
    }

    // Probe the data directory once at startup. Resolution stays per-request,
    // so a failure here is a warning, not fatal.
    match store.resolve().await {
        Ok(dir) => {
            let count = store
                .scan_images(&dir)
                .await
                .map(|images| images.len())
                .unwrap_or(0);
            info!("  Resolved data directory: {}", dir.display());
            info!("  Found {} image(s)", count);
        }
        Err(e) => {
            warn!("  {}", e);
            warn!("  Image requests will fail until the directory exists");
        }
    }

    // Build router configuration
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing)
        .with_debug_endpoint(config.debug_endpoint);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Create router
    let router = create_router(store, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("");
    info!("Try these endpoints:");
    info!("  curl http://{}/hello/", addr);
    info!("  curl http://{}/available-images/", addr);
    info!("  curl http://{}/annotation-image/?metadata=true", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "annotation_server=debug,tower_http=debug"
    } else {
        "annotation_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
