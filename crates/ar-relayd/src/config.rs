//! Relay daemon configuration, loadable from TOML.

use serde::Deserialize;

use ar_proxy::SessionConfig;
use ar_registry::RegistryConfig;

/// Top-level configuration for the relay daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Address the relay listens on for MQTT clients.
    pub listen_addr: String,
    /// Upstream MQTT endpoint packets and artifacts are forwarded to.
    pub upstream_addr: String,
    /// Per-session tuning.
    #[serde(default)]
    pub session: SessionConfig,
    /// Registry the fetch pump pulls artifacts from.
    pub registry: RegistryConfig,
}

impl RelayConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_proxy::FetchMode;

    #[test]
    fn deserialize_minimal_config() {
        let toml = r#"
listen_addr = "0.0.0.0:1883"
upstream_addr = "broker.internal:1883"

[registry]
registry_url = "https://registry.example.com"
repository = "fleet/firmware"
"#;
        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:1883");
        assert_eq!(config.session.worker_timeout_secs, 30); // default
        assert_eq!(config.session.fetch_mode, FetchMode::Poll); // default
        assert_eq!(config.registry.reference, "latest"); // default
    }

    #[test]
    fn deserialize_full_config() {
        let toml = r#"
listen_addr = "127.0.0.1:1883"
upstream_addr = "127.0.0.1:11883"

[session]
worker_timeout_secs = 10
fetch_backoff_ms = 500
fetch_mode = "once"

[registry]
registry_url = "http://localhost:5000"
repository = "edge/wasm-modules"
reference = "v2"
timeout_secs = 3
"#;
        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.session.worker_timeout_secs, 10);
        assert_eq!(config.session.fetch_backoff_ms, 500);
        assert_eq!(config.session.fetch_mode, FetchMode::Once);
        assert_eq!(config.registry.reference, "v2");
        assert_eq!(config.registry.timeout_secs, 3);
    }
}
