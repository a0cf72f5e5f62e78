//! Typed errors for plugin discovery and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by plugin enumeration and loading.
///
/// Loading never aborts the process and never panics across the module
/// boundary; every failure mode surfaces as one of these variants. Whether
/// a failed load is fatal to startup or merely skipped with a diagnostic is
/// the embedder's policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    /// The plugin search path does not exist.
    #[error("plugin search path not found: {0}")]
    NotFound(PathBuf),

    /// The plugin search path exists but is not a directory.
    #[error("plugin search path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The file is missing or is not a loadable library image for this
    /// platform.
    #[error("failed to load plugin library: {0}")]
    LoadFailure(String),

    /// The library does not export the well-known plugin entry symbol.
    #[error("plugin entry symbol `{symbol}` not found: {reason}")]
    SymbolResolutionFailure { symbol: String, reason: String },

    /// The plugin was built against a different ABI version. Compatibility
    /// is exact-match only: the record layout itself may change between API
    /// versions, so there is no safe way to probe further.
    #[error("plugin API version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// A required field of the plugin's info record is null or invalid.
    #[error("malformed plugin info: field `{field}` is null or invalid")]
    MalformedInfo { field: &'static str },

    /// The plugin's host-module allocator returned null.
    #[error("plugin host-module creation failed: {0}")]
    CreationFailed(String),

    /// An I/O error surfaced during discovery.
    #[error("plugin I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
