//! Default session handler reporting activity through tracing.
//!
//! Deployments with real session semantics supply their own
//! `SessionHandler`; the daemon ships this one so registry-fetch events
//! and relayed packets surface as structured session activity.

use async_trait::async_trait;

use ar_proxy::{HandlerError, SessionHandler};

/// Session handler that records activity as tracing events.
#[derive(Debug, Default)]
pub struct LogHandler {
    session_id: u64,
}

impl LogHandler {
    pub fn new(session_id: u64) -> Self {
        Self { session_id }
    }
}

#[async_trait]
impl SessionHandler for LogHandler {
    async fn connect(&self) -> Result<(), HandlerError> {
        tracing::info!(session_id = self.session_id, "session connect");
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HandlerError> {
        tracing::info!(
            session_id = self.session_id,
            topic = %topic,
            bytes = payload.len(),
            "session publish"
        );
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), HandlerError> {
        tracing::info!(session_id = self.session_id, "session disconnect");
        Ok(())
    }
}
