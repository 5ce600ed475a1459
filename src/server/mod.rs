//! HTTP server layer for the annotation image backend.
//!
//! The layer is split in two: `handlers` holds the request handlers and the
//! JSON request/response types, `routes` assembles them into an axum Router
//! with CORS and tracing middleware.

pub mod handlers;
pub mod routes;

pub use handlers::{
    available_images_handler, debug_info_handler, default_image_handler, hello_handler,
    named_image_handler, AppState, CandidateDebugInfo, DebugResponse, ErrorResponse,
    HelloResponse, ImageDescriptor, ImageListResponse, ImageMetadataResponse, ImageQueryParams,
};
pub use routes::{create_router, RouterConfig};
