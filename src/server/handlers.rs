//! HTTP request handlers for the annotation image API.
//!
//! # Endpoints
//!
//! - `GET /hello/` - Liveness probe
//! - `GET /annotation-image/` - Serve the first discovered image
//! - `GET /annotation-image/{name}` - Serve a specific image
//! - `GET /available-images/` - List all images with metadata
//! - `GET /debug/` - Directory resolution diagnostics (gated by config)

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use crate::error::ImageError;
use crate::store::{candidate_dirs, ImageFile, ImageStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The image store for directory resolution and file lookup
    pub store: Arc<ImageStore>,

    /// Cache-Control max-age in seconds for image responses
    pub cache_max_age: u32,
}

impl AppState {
    /// Create a new application state with the given store.
    pub fn new(store: ImageStore) -> Self {
        Self {
            store: Arc::new(store),
            cache_max_age: 3600, // 1 hour default
        }
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(store: ImageStore, cache_max_age: u32) -> Self {
        Self {
            store: Arc::new(store),
            cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for image fetch requests.
#[derive(Debug, Default, Deserialize)]
pub struct ImageQueryParams {
    /// Return JSON metadata instead of image bytes when set to "true".
    ///
    /// Only the literal string "true" enables metadata mode; anything else
    /// serves bytes.
    #[serde(default)]
    pub metadata: Option<String>,
}

impl ImageQueryParams {
    /// Whether the client asked for metadata instead of bytes.
    pub fn wants_metadata(&self) -> bool {
        self.metadata.as_deref() == Some("true")
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "image_not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Liveness probe response.
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    /// Static greeting confirming the backend is up
    pub message: String,
}

/// Metadata for a single image, returned by `?metadata=true`.
#[derive(Debug, Serialize)]
pub struct ImageMetadataResponse {
    /// Filename only, without directory components
    pub name: String,

    /// File size in bytes
    pub size: u64,

    /// Content type derived from the file extension
    #[serde(rename = "type")]
    pub content_type: String,

    /// Path to fetch this image, with the name percent-encoded
    pub url: String,
}

/// One entry in the available-images listing.
#[derive(Debug, Serialize)]
pub struct ImageDescriptor {
    /// Filename only
    pub name: String,

    /// File size in bytes
    pub size: u64,

    /// Path to fetch this image, with the name percent-encoded
    pub url: String,
}

impl ImageDescriptor {
    fn from_file(image: &ImageFile) -> Self {
        Self {
            name: image.name.clone(),
            size: image.size,
            url: image_url(&image.name),
        }
    }
}

/// Response from the available-images endpoint.
///
/// An unresolved or unreadable data directory degrades to an empty list with
/// an error indicator rather than a hard failure.
#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    /// Image descriptors in directory enumeration order
    pub images: Vec<ImageDescriptor>,

    /// Error message when the listing degraded to empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-candidate diagnostics for the debug endpoint.
#[derive(Debug, Serialize)]
pub struct CandidateDebugInfo {
    /// Candidate directory path
    pub path: String,

    /// Whether the path exists
    pub exists: bool,

    /// Whether the path is a directory
    pub is_dir: bool,

    /// Directory entries, when listable
    pub files: Vec<String>,
}

/// Response from the debug endpoint.
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    /// Configured base directory
    pub base_dir: String,

    /// Explicitly configured data directory, if any
    pub data_dir: Option<String>,

    /// Process working directory
    pub cwd: String,

    /// Candidate directories in resolution order
    pub candidates: Vec<CandidateDebugInfo>,
}

/// Build the fetch URL for an image name, percent-encoding the name.
pub fn image_url(name: &str) -> String {
    format!("/annotation-image/{}", urlencoding::encode(name))
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ImageError to HTTP response.
///
/// 5xx errors are logged at ERROR level; 404s at DEBUG (common and expected).
impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // Deployment/configuration problem, not a bad request
            ImageError::DirectoryNotFound { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "directory_not_found",
                self.to_string(),
            ),

            ImageError::NoImagesAvailable { .. } => (
                StatusCode::NOT_FOUND,
                "no_images_available",
                self.to_string(),
            ),

            // Message carries the attempted path for diagnosis
            ImageError::ImageNotFound { .. } => {
                (StatusCode::NOT_FOUND, "image_not_found", self.to_string())
            }

            ImageError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                self.to_string(),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle liveness probe requests.
///
/// # Endpoint
///
/// `GET /hello/`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {"message": "Hello from Django Backend!"}
/// ```
///
/// The message is a fixed value the frontend probes for; do not reword it.
pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from Django Backend!".to_string(),
    })
}

/// Serve the first image discovered in the data directory.
///
/// # Endpoint
///
/// `GET /annotation-image/`
///
/// # Query Parameters
///
/// - `metadata`: "true" to return JSON metadata instead of image bytes
///
/// # Response
///
/// - `200 OK`: Image bytes with derived content type, or metadata JSON
/// - `404 Not Found`: Directory contains no image files
/// - `500 Internal Server Error`: Data directory not found, or I/O error
pub async fn default_image_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageQueryParams>,
) -> Result<Response, ImageError> {
    serve_image(&state, None, &query).await
}

/// Serve a specific image by name.
///
/// # Endpoint
///
/// `GET /annotation-image/{name}`
///
/// # Path Parameters
///
/// - `name`: Filename inside the data directory (percent-encoded as needed;
///   the router decodes it before it reaches the handler)
///
/// # Query Parameters
///
/// - `metadata`: "true" to return JSON metadata instead of image bytes
///
/// # Response
///
/// - `200 OK`: Image bytes with derived content type, or metadata JSON
/// - `404 Not Found`: No such file in the data directory
/// - `500 Internal Server Error`: Data directory not found, or I/O error
pub async fn named_image_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ImageQueryParams>,
) -> Result<Response, ImageError> {
    serve_image(&state, Some(&name), &query).await
}

/// Shared fetch path for the named and first-found variants.
async fn serve_image(
    state: &AppState,
    name: Option<&str>,
    query: &ImageQueryParams,
) -> Result<Response, ImageError> {
    let dir = state.store.resolve().await?;

    let image = match name {
        Some(name) => state.store.named_image(&dir, name).await?,
        None => state.store.first_image(&dir).await?,
    };

    if query.wants_metadata() {
        let metadata = ImageMetadataResponse {
            name: image.name.clone(),
            size: image.size,
            content_type: image.content_type().to_string(),
            url: image_url(&image.name),
        };
        return Ok(Json(metadata).into_response());
    }

    debug!(name = %image.name, size = image.size, "serving image");

    // ReaderStream owns the file handle; it is closed when the body has been
    // fully sent or the connection is dropped.
    let file = tokio::fs::File::open(&image.path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type())
        .header(header::CONTENT_LENGTH, image.size)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .body(body)
        .unwrap();

    Ok(response)
}

/// List all available images with name, size, and fetch URL.
///
/// # Endpoint
///
/// `GET /available-images/`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "images": [
///     {"name": "a.png", "size": 1024, "url": "/annotation-image/a.png"}
///   ]
/// }
/// ```
///
/// An unresolved or unreadable data directory degrades to
/// `{"images": [], "error": "..."}` rather than a hard failure.
pub async fn available_images_handler(State(state): State<AppState>) -> Json<ImageListResponse> {
    let dir = match state.store.resolve().await {
        Ok(dir) => dir,
        Err(e) => {
            warn!("image listing degraded to empty: {}", e);
            return Json(ImageListResponse {
                images: Vec::new(),
                error: Some(e.to_string()),
            });
        }
    };

    match state.store.scan_images(&dir).await {
        Ok(images) => Json(ImageListResponse {
            images: images.iter().map(ImageDescriptor::from_file).collect(),
            error: None,
        }),
        Err(e) => {
            error!(dir = %dir.display(), "failed to list images: {}", e);
            Json(ImageListResponse {
                images: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

/// Report directory resolution diagnostics.
///
/// # Endpoint
///
/// `GET /debug/`
///
/// # Response
///
/// `200 OK` with the configured base directory, working directory, and
/// per-candidate existence and contents.
///
/// Exposes absolute filesystem paths; the route is only mounted when
/// explicitly enabled in the configuration.
pub async fn debug_info_handler(State(state): State<AppState>) -> Json<DebugResponse> {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "<unavailable>".to_string());

    let mut candidates = Vec::new();
    for path in candidate_dirs(state.store.base_dir()) {
        let meta = tokio::fs::metadata(&path).await.ok();
        let exists = meta.is_some();
        let is_dir = meta.map(|m| m.is_dir()).unwrap_or(false);

        let mut files = Vec::new();
        if is_dir {
            if let Ok(mut entries) = tokio::fs::read_dir(&path).await {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    files.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }

        candidates.push(CandidateDebugInfo {
            path: path.display().to_string(),
            exists,
            is_dir,
            files,
        });
    }

    Json(DebugResponse {
        base_dir: state.store.base_dir().display().to_string(),
        data_dir: state.store.data_dir().map(|p| p.display().to_string()),
        cwd,
        candidates,
    })
}

// =============================================================================
// Tests
// =============================================================================
