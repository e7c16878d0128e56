//! Registry client error types.

use thiserror::Error;

/// Errors that can occur while fetching an artifact from the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("registry returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("manifest has no layers")]
    EmptyManifest,
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
