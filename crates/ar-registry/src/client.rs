//! ORAS-style artifact client for the OCI distribution API.
//!
//! Resolves the manifest for a configured `repository:reference`, takes
//! the first layer, and pulls its blob. Authentication and digest
//! verification are the registry's and deployment's concern, not ours.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// Accept header for OCI image manifests.
const MANIFEST_MEDIA_TYPE: &str = "application/vnd.oci.image.manifest.v1+json";

// ── ArtifactSource trait ──────────────────────────────────────

/// Abstraction for pulling artifact payloads from a registry.
///
/// Enables mocking in tests without a real registry. One call yields
/// one artifact payload.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch one artifact payload.
    async fn fetch(&self) -> RegistryResult<Bytes>;
}

// ── Manifest wire types ───────────────────────────────────────

/// OCI image manifest (only the fields we need).
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
struct Layer {
    digest: String,
}

// ── OrasClient ────────────────────────────────────────────────

/// Artifact client speaking the OCI distribution HTTP API.
pub struct OrasClient {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl OrasClient {
    /// Build a client with the configured per-request timeout.
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Resolve the manifest for the configured repository and reference.
    async fn resolve_manifest(&self) -> RegistryResult<Manifest> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.config.registry_url, self.config.repository, self.config.reference
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, MANIFEST_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .json::<Manifest>()
            .await
            .map_err(|e| RegistryError::Manifest(e.to_string()))
    }

    /// Pull a blob by digest.
    async fn pull_blob(&self, digest: &str) -> RegistryResult<Bytes> {
        let url = format!(
            "{}/v2/{}/blobs/{}",
            self.config.registry_url, self.config.repository, digest
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))
    }
}

#[async_trait]
impl ArtifactSource for OrasClient {
    async fn fetch(&self) -> RegistryResult<Bytes> {
        let manifest = self.resolve_manifest().await?;
        let layer = manifest.layers.first().ok_or(RegistryError::EmptyManifest)?;

        tracing::debug!(
            repository = %self.config.repository,
            reference = %self.config.reference,
            digest = %layer.digest,
            "pulling artifact layer"
        );

        self.pull_blob(&layer.digest).await
    }
}
