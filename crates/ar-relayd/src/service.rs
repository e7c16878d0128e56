//! Proxy service — accepts MQTT clients and runs one relay session each.
//!
//! Holds the long-lived collaborator handles (artifact source, session
//! config) and wires each accepted client connection plus a freshly
//! dialed upstream connection into `ar_proxy::stream`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::{TcpListener, TcpStream};

use ar_proxy::{SessionConfig, SessionHandler, stream};
use ar_registry::{ArtifactSource, OrasClient};

use crate::config::RelayConfig;
use crate::handler::LogHandler;

/// Long-lived relay service state.
pub struct ProxyService {
    session: SessionConfig,
    upstream_addr: String,
    source: Arc<dyn ArtifactSource>,
    next_session_id: AtomicU64,
}

impl ProxyService {
    /// Build the service and its registry client handle.
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let source = OrasClient::new(config.registry.clone())?;
        Ok(Self {
            session: config.session.clone(),
            upstream_addr: config.upstream_addr.clone(),
            source: Arc::new(source),
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Accept clients forever, one relay session per connection.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (client, peer) = listener.accept().await?;
            let service = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = service.run_session(client).await {
                    tracing::warn!(peer = %peer, error = %e, "session setup failed");
                }
            });
        }
    }

    /// Dial the upstream and stream one session.
    async fn run_session(&self, client: TcpStream) -> anyhow::Result<()> {
        let upstream = TcpStream::connect(&self.upstream_addr).await?;
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);

        let (client_read, _client_write) = client.into_split();
        let (_upstream_read, upstream_write) = upstream.into_split();

        let handler: Arc<dyn SessionHandler> = Arc::new(LogHandler::new(session_id));

        tracing::info!(session_id, "session started");
        match stream(
            self.session.clone(),
            client_read,
            upstream_write,
            Arc::clone(&self.source),
            handler,
        )
        .await
        {
            Ok(()) => tracing::info!(session_id, "session closed"),
            Err(e) => tracing::warn!(session_id, error = %e, "session failed"),
        }
        Ok(())
    }
}
