use serde::Deserialize;

/// OCI registry connection settings, loadable from TOML or environment.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Registry base URL (e.g., "https://registry.example.com").
    pub registry_url: String,
    /// Repository holding the artifact (e.g., "fleet/firmware").
    pub repository: String,
    /// Tag or digest to resolve.
    #[serde(default = "default_reference")]
    pub reference: String,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_reference() -> String {
    "latest".into()
}

fn default_timeout_secs() -> u64 {
    10
}
