//! Session behavior seam consumed by both pumps.
//!
//! The relay core never constructs a handler; the caller supplies one per
//! session and the core only invokes it in response to protocol events.

use async_trait::async_trait;
use thiserror::Error;

/// Opaque failure reported by a session handler.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Session-behavior capability set.
///
/// `connect` doubles as the per-fetch handshake of the fetch pump and the
/// CONNECT packet dispatch of the packet pump. `disconnect` is invoked
/// exactly once per session, by the orchestrator's finalizer.
#[async_trait]
pub trait SessionHandler: Send + Sync {
    /// Accept (or reject) a session handshake.
    async fn connect(&self) -> Result<(), HandlerError>;

    /// Observe an application message before it is relayed.
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HandlerError>;

    /// Tear the session down.
    async fn disconnect(&self) -> Result<(), HandlerError>;
}
