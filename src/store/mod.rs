//! Image store: locates the data directory and the image files inside it.
//!
//! The store is a thin facade over the filesystem. Nothing is cached; every
//! request resolves the directory and scans it fresh, so images dropped into
//! the data directory are visible immediately.

pub mod resolver;

pub use resolver::{candidate_dirs, resolve_data_dir, APP_DIR, DATA_DIR};

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ImageError;

/// Image file extensions the store recognizes (matched case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Generic content type for files without a recognized image extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A single image file discovered in the data directory.
///
/// Built transiently per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Filename only, without any directory component
    pub name: String,

    /// Full path to the file on disk
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,
}

impl ImageFile {
    /// Derive the content type from the file extension.
    pub fn content_type(&self) -> &'static str {
        content_type(&self.name)
    }
}

/// Check whether a filename carries one of the recognized image extensions.
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Map a filename to its content type by extension (case-insensitive).
pub fn content_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".png") {
        "image/png"
    } else {
        OCTET_STREAM
    }
}

/// Locates the data directory and image files inside it.
///
/// The base directory is passed in explicitly (never read from ambient
/// state), so tests can inject temporary directories.
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
    data_dir: Option<PathBuf>,
}

impl ImageStore {
    /// Create a store that resolves the data directory from `base_dir` via
    /// the candidate list.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            data_dir: None,
        }
    }

    /// Pin the store to an explicit data directory, bypassing candidate
    /// guessing.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// The configured base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The explicitly configured data directory, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Resolve the data directory for this request.
    pub async fn resolve(&self) -> Result<PathBuf, ImageError> {
        resolve_data_dir(&self.base_dir, self.data_dir.as_deref()).await
    }

    /// Scan a directory (non-recursive) for image files, in the directory's
    /// natural enumeration order.
    ///
    /// A per-file stat failure is logged and the file skipped; only a failure
    /// to list the directory itself is fatal.
    pub async fn scan_images(&self, dir: &Path) -> Result<Vec<ImageFile>, ImageError> {
        let mut images = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_image_name(&name) {
                continue;
            }

            match entry.metadata().await {
                Ok(meta) if meta.is_file() => {
                    images.push(ImageFile {
                        name,
                        path: entry.path(),
                        size: meta.len(),
                    });
                }
                Ok(_) => {
                    // Directory with an image-like name; skip
                }
                Err(e) => {
                    warn!(file = %name, "failed to stat image file, skipping: {}", e);
                }
            }
        }

        Ok(images)
    }

    /// Pick the first image in the directory's enumeration order.
    ///
    /// Per-file stat failures are skipped like in [`scan_images`], so the
    /// pick always matches the first entry the listing would report.
    ///
    /// [`scan_images`]: ImageStore::scan_images
    pub async fn first_image(&self, dir: &Path) -> Result<ImageFile, ImageError> {
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_image_name(&name) {
                continue;
            }

            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(file = %name, "failed to stat image file, skipping: {}", e);
                    continue;
                }
            };
            if meta.is_file() {
                return Ok(ImageFile {
                    name,
                    path: entry.path(),
                    size: meta.len(),
                });
            }
        }

        Err(ImageError::NoImagesAvailable {
            dir: dir.to_path_buf(),
        })
    }

    /// Look up a specific filename inside the directory.
    ///
    /// The name must be a plain filename; anything carrying a path component
    /// cannot name a file in the flat data directory and is rejected as not
    /// found rather than allowed to escape the directory.
    pub async fn named_image(&self, dir: &Path, name: &str) -> Result<ImageFile, ImageError> {
        let path = dir.join(name);

        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(ImageError::ImageNotFound {
                name: name.to_string(),
                path,
            });
        }

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ImageError::ImageNotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(e) => return Err(ImageError::Io(e)),
        };

        if !meta.is_file() {
            return Err(ImageError::ImageNotFound {
                name: name.to_string(),
                path,
            });
        }

        Ok(ImageFile {
            name: name.to_string(),
            path,
            size: meta.len(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
