use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or serving annotation images.
///
/// Every variant is handled at the request boundary and converted into an
/// HTTP response; nothing propagates past a single request.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No candidate data directory exists (deployment/configuration problem)
    #[error("image data directory not found; searched {searched:?}")]
    DirectoryNotFound { searched: Vec<PathBuf> },

    /// The data directory exists but contains no image files
    #[error("no image files found in {}", .dir.display())]
    NoImagesAvailable { dir: PathBuf },

    /// A specifically requested image does not exist (or is not a regular file)
    #[error("image {name} not found at {}", .path.display())]
    ImageNotFound { name: String, path: PathBuf },

    /// Unexpected filesystem error while listing or reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
