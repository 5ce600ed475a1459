//! Configuration for the annotation image server.
//!
//! Settings come from command-line arguments via clap, with environment
//! variable fallbacks under the `ANNO_` prefix and sensible defaults for
//! everything optional.
//!
//! # Environment Variables
//!
//! - `ANNO_HOST` - Server bind address (default: 0.0.0.0)
//! - `ANNO_PORT` - Server port (default: 8000)
//! - `ANNO_BASE_DIR` - Base directory for data directory discovery (default: .)
//! - `ANNO_DATA_DIR` - Explicit data directory, bypasses discovery
//! - `ANNO_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `ANNO_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//! - `ANNO_DEBUG_ENDPOINT` - Expose the /debug/ endpoint (default: false)

use std::path::PathBuf;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default base directory for data directory discovery.
pub const DEFAULT_BASE_DIR: &str = ".";

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Annotation image server.
///
/// Serves static image files from a local data directory and lists them with
/// basic metadata, in support of a frontend image-annotation feature.
#[derive(Parser, Debug, Clone)]
#[command(name = "annotation-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ANNO_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ANNO_PORT")]
    pub port: u16,

    // =========================================================================
    // Data Directory Configuration
    // =========================================================================
    /// Base directory the data directory is discovered from.
    ///
    /// The server searches a fixed list of candidate subdirectories under
    /// this path (see `store::candidate_dirs`).
    #[arg(long, default_value = DEFAULT_BASE_DIR, env = "ANNO_BASE_DIR")]
    pub base_dir: PathBuf,

    /// Explicit image data directory.
    ///
    /// When set, candidate discovery is skipped and this directory is used
    /// directly. Preferred for production deployments.
    #[arg(long, env = "ANNO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds for image responses.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "ANNO_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "ANNO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Expose the /debug/ introspection endpoint.
    ///
    /// The endpoint reports absolute filesystem paths, so it is off by
    /// default and should stay off on externally reachable deployments.
    #[arg(long, default_value_t = false, env = "ANNO_DEBUG_ENDPOINT")]
    pub debug_endpoint: bool,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_dir.as_os_str().is_empty() {
            return Err("base directory must not be empty. Set --base-dir or ANNO_BASE_DIR".to_string());
        }

        // An explicitly configured data directory must exist up front;
        // candidate discovery is allowed to fail per request instead.
        if let Some(ref dir) = self.data_dir {
            if !dir.is_dir() {
                return Err(format!(
                    "data directory {} does not exist or is not a directory. \
                     Fix --data-dir / ANNO_DATA_DIR, or unset it to use discovery",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
