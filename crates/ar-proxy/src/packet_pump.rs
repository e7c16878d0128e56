//! MQTT control packet loop.
//!
//! Reads one packet per iteration off the input connection, dispatches it
//! to the session handler, and relays it downstream byte-for-byte. A read
//! failure, a rejected dispatch, or an explicit DISCONNECT ends the pump.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::codec::PacketReader;
use crate::config::SessionConfig;
use crate::error::ProxyError;
use crate::handler::SessionHandler;
use crate::packet::{ControlPacket, DISCONNECT_FRAME};
use crate::writer::SharedWriter;

/// Run the packet pump until an error, the deadline, cancellation, or a
/// DISCONNECT packet.
///
/// A DISCONNECT ends the pump cleanly (`Ok`); the handler's own
/// `disconnect` runs once, in the orchestrator's finalizer. Intended to
/// be spawned as a session-scoped tokio task.
pub async fn run<R, W>(
    input: R,
    writer: SharedWriter<W>,
    handler: Arc<dyn SessionHandler>,
    config: &SessionConfig,
    cancel: CancellationToken,
) -> Result<(), ProxyError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let deadline = Instant::now() + config.worker_timeout();
    let mut reader = PacketReader::new(input, config.max_packet_size);

    loop {
        // Biased so cancellation and the deadline win over a
        // connection with bytes already buffered.
        let frame = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ProxyError::Cancelled),
            () = time::sleep_until(deadline) => return Err(ProxyError::DeadlineExpired),
            read = reader.next() => read?,
        };

        match &frame.packet {
            ControlPacket::Publish { topic, payload } => {
                if let Err(source) = handler.publish(topic, payload).await {
                    // Tell the downstream side the session is over. A
                    // failure here merges into the publish error rather
                    // than replacing it.
                    let disconnect_write = writer.write_frame(&DISCONNECT_FRAME).await.err();
                    return Err(ProxyError::Publish {
                        source,
                        disconnect_write,
                    });
                }
                tracing::debug!(topic = %topic, bytes = payload.len(), "publish accepted");
            }
            ControlPacket::Connect => {
                handler
                    .connect()
                    .await
                    .map_err(ProxyError::ConnectHandshake)?;
            }
            ControlPacket::Disconnect => {
                writer
                    .write_frame(&frame.raw)
                    .await
                    .map_err(ProxyError::RelayWrite)?;
                tracing::debug!("disconnect packet received, ending pump");
                return Ok(());
            }
            ControlPacket::Other { kind } => {
                tracing::trace!(kind = %kind, "passing packet through");
            }
        }

        writer
            .write_frame(&frame.raw)
            .await
            .map_err(ProxyError::RelayWrite)?;
    }
}
