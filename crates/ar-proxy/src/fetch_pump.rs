//! Registry fetch loop.
//!
//! Continuously pulls artifact payloads from the registry side and
//! injects them into the MQTT-facing connection. Every delivery is gated
//! by a `connect` handshake; every failure is terminal for the pump.

use std::sync::Arc;

use tokio::io::AsyncWrite;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use ar_registry::ArtifactSource;

use crate::config::{FetchMode, SessionConfig};
use crate::error::ProxyError;
use crate::handler::SessionHandler;
use crate::writer::SharedWriter;

/// Run the fetch pump until an error, the deadline, or cancellation.
///
/// The deadline is measured from pump start, independent of the packet
/// pump's. Intended to be spawned as a session-scoped tokio task.
pub async fn run<W>(
    source: Arc<dyn ArtifactSource>,
    writer: SharedWriter<W>,
    handler: Arc<dyn SessionHandler>,
    config: &SessionConfig,
    cancel: CancellationToken,
) -> Result<(), ProxyError>
where
    W: AsyncWrite + Unpin + Send,
{
    let deadline = Instant::now() + config.worker_timeout();
    let backoff = config.fetch_backoff();

    loop {
        // Biased so cancellation and the deadline win over an
        // always-ready source instead of racing it.
        let artifact = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ProxyError::Cancelled),
            () = time::sleep_until(deadline) => return Err(ProxyError::DeadlineExpired),
            fetched = source.fetch() => fetched?,
        };

        // Per-fetch handshake, not a one-time connect.
        handler
            .connect()
            .await
            .map_err(ProxyError::ConnectHandshake)?;

        writer
            .write_frame(&artifact)
            .await
            .map_err(ProxyError::ArtifactWrite)?;
        tracing::debug!(bytes = artifact.len(), "artifact delivered");

        match config.fetch_mode {
            FetchMode::Poll => {
                if !backoff.is_zero() {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(ProxyError::Cancelled),
                        () = time::sleep(backoff) => {}
                    }
                }
            }
            FetchMode::Once => {
                // Delivered; keep the session leg open without re-fetching.
                tokio::select! {
                    () = cancel.cancelled() => return Err(ProxyError::Cancelled),
                    () = time::sleep_until(deadline) => return Err(ProxyError::DeadlineExpired),
                }
            }
        }
    }
}
