//! # Annotation Image Server
//!
//! A small HTTP backend that locates and serves static image files from a
//! local data directory, in support of a frontend image-annotation feature.
//!
//! The server resolves the data directory from a fixed candidate list (or an
//! explicitly configured path), filters directory entries by image extension,
//! and exposes:
//!
//! - a fetch endpoint returning one image (specific or first-found) as raw
//!   bytes or as JSON metadata, and
//! - a listing endpoint enumerating all images with name, size, and URL.
//!
//! Nothing is cached and nothing outlives a single request; every request
//! resolves the directory and reads the filesystem fresh.
//!
//! ## Architecture
//!
//! - [`store`] - Directory resolution and image file lookup
//! - [`server`] - Axum-based HTTP handlers and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use annotation_server::server::{create_router, RouterConfig};
//! use annotation_server::store::ImageStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = ImageStore::new(".");
//!     let router = create_router(store, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::ImageError;
pub use server::{
    create_router, AppState, ErrorResponse, ImageDescriptor, ImageListResponse,
    ImageMetadataResponse, RouterConfig,
};
pub use store::{
    candidate_dirs, content_type, is_image_name, resolve_data_dir, ImageFile, ImageStore,
    IMAGE_EXTENSIONS,
};
