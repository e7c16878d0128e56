//! Stream orchestrator.
//!
//! Runs the fetch pump and the packet pump concurrently over one session,
//! takes the first terminal outcome, cancels the other pump, and always
//! finalizes with the handler's `disconnect`.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ar_registry::ArtifactSource;

use crate::config::SessionConfig;
use crate::error::{ProxyError, SessionError};
use crate::handler::SessionHandler;
use crate::writer::SharedWriter;
use crate::{fetch_pump, packet_pump};

/// Proxy one session between an MQTT-facing connection pair and a
/// registry artifact source.
///
/// `input` is read only by the packet pump; `output` receives both
/// relayed packets and fetched artifacts through a serialized writer.
/// Both connections must already be established.
///
/// Returns after the first pump reports and the handler disconnect ran.
/// The slower pump is cancelled at that point and winds down in the
/// background; `stream` does not wait for it.
pub async fn stream<In, Out>(
    config: SessionConfig,
    input: In,
    output: Out,
    source: Arc<dyn ArtifactSource>,
    handler: Arc<dyn SessionHandler>,
) -> Result<(), SessionError>
where
    In: AsyncRead + Unpin + Send + 'static,
    Out: AsyncWrite + Unpin + Send + 'static,
{
    let writer = SharedWriter::new(output);
    let cancel = CancellationToken::new();
    // Room for both terminal signals so neither pump blocks on delivery.
    let (results, mut first) = mpsc::channel::<Result<(), ProxyError>>(2);

    {
        let results = results.clone();
        let writer = writer.clone();
        let handler = Arc::clone(&handler);
        let config = config.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = fetch_pump::run(source, writer, handler, &config, cancel).await;
            let _ = results.send(outcome).await;
        });
    }
    {
        let handler = Arc::clone(&handler);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = packet_pump::run(input, writer, handler, &config, cancel).await;
            let _ = results.send(outcome).await;
        });
    }

    tracing::debug!("session pumps started");

    let outcome = first.recv().await.unwrap_or(Err(ProxyError::Cancelled));
    cancel.cancel();

    let disconnect = handler.disconnect().await.err();

    match SessionError::join(outcome.err(), disconnect) {
        None => {
            tracing::info!("session ended cleanly");
            Ok(())
        }
        Some(err) => {
            tracing::warn!(error = %err, "session ended");
            Err(err)
        }
    }
}
