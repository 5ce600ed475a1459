//! Data directory resolution.
//!
//! The image data directory historically lived in a handful of places relative
//! to the configured base directory, depending on how the backend was deployed.
//! Resolution walks an ordered candidate list and picks the first existing
//! directory. An explicitly configured data directory bypasses the guessing
//! entirely and is the preferred way to run the server.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ImageError;

/// Application subdirectory that may contain the data directory.
pub const APP_DIR: &str = "backend";

/// Name of the image data directory.
pub const DATA_DIR: &str = "image_data";

/// Build the ordered list of candidate data directories for a base directory.
///
/// Order defines priority: the first candidate that exists and is a directory
/// wins. The list covers the layouts the backend has been deployed with:
/// the app subdirectory, the base directory itself, a checkout-root layout,
/// and a sibling of the base directory.
pub fn candidate_dirs(base: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        base.join(APP_DIR).join(DATA_DIR),
        base.join(DATA_DIR),
        base.join("annotation-server").join(APP_DIR).join(DATA_DIR),
    ];

    if let Some(parent) = base.parent() {
        candidates.push(parent.join(APP_DIR).join(DATA_DIR));
    }

    candidates
}

/// Resolve the data directory.
///
/// If `explicit` is set it is validated and used directly; otherwise the
/// candidate list derived from `base` is searched in order. Resolution runs
/// per request and is never cached, so a directory created after startup is
/// picked up on the next request.
///
/// # Errors
///
/// Returns [`ImageError::DirectoryNotFound`] with the searched paths when no
/// candidate exists. This is a deployment problem, not a bad request.
pub async fn resolve_data_dir(
    base: &Path,
    explicit: Option<&Path>,
) -> Result<PathBuf, ImageError> {
    if let Some(dir) = explicit {
        if is_dir(dir).await {
            return Ok(dir.to_path_buf());
        }
        return Err(ImageError::DirectoryNotFound {
            searched: vec![dir.to_path_buf()],
        });
    }

    let candidates = candidate_dirs(base);
    for candidate in &candidates {
        debug!(path = %candidate.display(), "checking candidate data directory");
        if is_dir(candidate).await {
            debug!(path = %candidate.display(), "resolved data directory");
            return Ok(candidate.clone());
        }
    }

    Err(ImageError::DirectoryNotFound {
        searched: candidates,
    })
}

/// Check whether a path exists and is a directory.
async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================
