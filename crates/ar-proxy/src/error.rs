//! Proxy core error types.

use thiserror::Error;

use crate::codec::CodecError;
use crate::handler::HandlerError;
use ar_registry::RegistryError;

/// Terminal error reported by one of the session pumps.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read control packet: {0}")]
    ReadPacket(#[from] CodecError),

    #[error("artifact fetch failed: {0}")]
    Fetch(#[from] RegistryError),

    #[error("connect handshake rejected: {0}")]
    ConnectHandshake(#[source] HandlerError),

    #[error("publish rejected: {source}{}", teardown_note(.disconnect_write))]
    Publish {
        #[source]
        source: HandlerError,
        /// Set when writing the synthesized DISCONNECT also failed.
        disconnect_write: Option<std::io::Error>,
    },

    #[error("packet relay write failed: {0}")]
    RelayWrite(std::io::Error),

    #[error("artifact write failed: {0}")]
    ArtifactWrite(std::io::Error),

    #[error("session deadline expired")]
    DeadlineExpired,

    #[error("session cancelled")]
    Cancelled,
}

fn teardown_note(err: &Option<std::io::Error>) -> String {
    match err {
        Some(e) => format!("; disconnect packet write failed: {e}"),
        None => String::new(),
    }
}

/// Joined terminal outcome of a session.
///
/// Preserves both the error that ended the session and any failure from
/// the final handler disconnect. At least one of the two is set; neither
/// is ever silently dropped.
#[derive(Debug, Error)]
#[error("{}", render(.cause, .disconnect))]
pub struct SessionError {
    /// First terminal error reported by either pump, if any.
    pub cause: Option<ProxyError>,
    /// Failure of the mandatory handler disconnect, if any.
    pub disconnect: Option<HandlerError>,
}

impl SessionError {
    /// Join the pump outcome with the disconnect outcome.
    ///
    /// Returns `None` when the session ended cleanly on both fronts.
    pub fn join(cause: Option<ProxyError>, disconnect: Option<HandlerError>) -> Option<Self> {
        if cause.is_none() && disconnect.is_none() {
            return None;
        }
        Some(Self { cause, disconnect })
    }
}

fn render(cause: &Option<ProxyError>, disconnect: &Option<HandlerError>) -> String {
    match (cause, disconnect) {
        (Some(c), Some(d)) => format!("{c}; disconnect failed: {d}"),
        (Some(c), None) => c.to_string(),
        (None, Some(d)) => format!("disconnect failed: {d}"),
        (None, None) => "session ended".to_string(),
    }
}
