use std::time::Duration;

use serde::Deserialize;

/// Whether the fetch pump keeps re-pulling the configured reference.
///
/// The registry API cannot tell us if a reference is expected to change
/// under a session, so the behavior is an explicit knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Re-fetch the same reference for the life of the session.
    #[default]
    Poll,
    /// Deliver one artifact, then hold the session open until
    /// cancellation or deadline.
    Once,
}

/// Per-session tuning for the two pumps.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Deadline for each pump, measured from pump start.
    #[serde(default = "default_worker_timeout_secs")]
    pub worker_timeout_secs: u64,
    /// Delay between registry fetches. Zero means a tight loop.
    #[serde(default)]
    pub fetch_backoff_ms: u64,
    /// Fetch pump behavior after a successful delivery.
    #[serde(default)]
    pub fetch_mode: FetchMode,
    /// Largest control packet the reader will accept.
    #[serde(default = "default_max_packet_size")]
    pub max_packet_size: usize,
}

fn default_worker_timeout_secs() -> u64 {
    30
}

fn default_max_packet_size() -> usize {
    256 * 1024
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            worker_timeout_secs: default_worker_timeout_secs(),
            fetch_backoff_ms: 0,
            fetch_mode: FetchMode::default(),
            max_packet_size: default_max_packet_size(),
        }
    }
}

impl SessionConfig {
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs)
    }

    pub fn fetch_backoff(&self) -> Duration {
        Duration::from_millis(self.fetch_backoff_ms)
    }
}
