//! Streaming core of the artifact relay.
//!
//! Bridges one MQTT-speaking connection and one OCI registry per session:
//! - `packet_pump` reads MQTT control packets, dispatches them to a
//!   `SessionHandler`, and relays them downstream
//! - `fetch_pump` continuously pulls artifact payloads from an
//!   `ArtifactSource` and injects them into the same downstream connection
//! - `stream` runs both pumps concurrently with first-error-wins
//!   semantics and guaranteed handler teardown

pub mod codec;
pub mod config;
pub mod error;
pub mod fetch_pump;
pub mod handler;
pub mod mock;
pub mod packet;
pub mod packet_pump;
pub mod stream;
pub mod writer;

// Re-exports for convenience.
pub use codec::{CodecError, PacketReader};
pub use config::{FetchMode, SessionConfig};
pub use error::{ProxyError, SessionError};
pub use handler::{HandlerError, SessionHandler};
pub use mock::{HandlerEvent, MockSessionHandler};
pub use packet::{ControlPacket, DISCONNECT_FRAME, Frame, classify};
pub use stream::stream;
pub use writer::SharedWriter;
