//! OCI registry artifact source for the artifact relay.
//!
//! Provides the registry-side collaborator of a proxied session:
//! - `ArtifactSource` trait for fetching artifact payloads (mockable in tests)
//! - `OrasClient` pulling manifest + first layer blob over the OCI
//!   distribution HTTP API
//! - `MockArtifactSource` for testing without a registry

pub mod client;
pub mod config;
pub mod error;
pub mod mock;

// Re-exports for convenience.
pub use client::{ArtifactSource, OrasClient};
pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use mock::MockArtifactSource;
