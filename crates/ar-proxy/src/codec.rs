//! Buffered MQTT control packet reader.
//!
//! Adapts `rumqttc`'s v4 wire codec to an `AsyncRead` connection. The
//! reader owns a receive buffer and yields one classified `Frame` per
//! call, preserving the exact wire bytes of every packet.

use bytes::{Bytes, BytesMut};
use rumqttc::mqttbytes::{self, v4};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::packet::{Frame, classify};

/// Errors raised while reading a control packet off the connection.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads whole MQTT control packets from a byte stream.
pub struct PacketReader<R> {
    reader: R,
    buf: BytesMut,
    max_packet_size: usize,
}

impl<R: AsyncRead + Unpin> PacketReader<R> {
    pub fn new(reader: R, max_packet_size: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(4 * 1024),
            max_packet_size,
        }
    }

    /// Read the next control packet.
    ///
    /// Cancel-safe: partially received bytes stay buffered and the next
    /// call resumes decoding from them.
    pub async fn next(&mut self) -> Result<Frame, CodecError> {
        loop {
            // Decode against a scratch copy so the consumed length is
            // known and the original wire bytes can be split off intact.
            let mut scratch = BytesMut::from(&self.buf[..]);
            match v4::read(&mut scratch, self.max_packet_size) {
                Ok(packet) => {
                    let consumed = self.buf.len() - scratch.len();
                    let raw: Bytes = self.buf.split_to(consumed).freeze();
                    return Ok(Frame {
                        packet: classify(packet),
                        raw,
                    });
                }
                Err(mqttbytes::Error::InsufficientBytes(_)) => {
                    let n = self.reader.read_buf(&mut self.buf).await?;
                    if n == 0 {
                        return Err(CodecError::ConnectionClosed);
                    }
                }
                Err(e) => return Err(CodecError::Malformed(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::ControlPacket;
    use rumqttc::QoS;
    use tokio::io::AsyncWriteExt;

    const MAX_PACKET_SIZE: usize = 256 * 1024;

    fn encode_connect(client_id: &str) -> Vec<u8> {
        let mut buf = BytesMut::new();
        v4::Connect::new(client_id).write(&mut buf).unwrap();
        buf.to_vec()
    }

    fn encode_publish(topic: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        v4::Publish::new(topic, QoS::AtMostOnce, payload)
            .write(&mut buf)
            .unwrap();
        buf.to_vec()
    }

    #[tokio::test]
    async fn reads_publish_with_raw_bytes() {
        let wire = encode_publish("sensors/temp", &[0x01, 0x02]);
        let mut reader = PacketReader::new(&wire[..], MAX_PACKET_SIZE);

        let frame = reader.next().await.unwrap();
        assert_eq!(
            frame.packet,
            ControlPacket::Publish {
                topic: "sensors/temp".into(),
                payload: Bytes::from_static(&[0x01, 0x02]),
            }
        );
        assert_eq!(&frame.raw[..], &wire[..]);
    }

    #[tokio::test]
    async fn reads_back_to_back_packets() {
        let mut wire = encode_connect("dev-1");
        wire.extend_from_slice(&crate::packet::DISCONNECT_FRAME);
        let mut reader = PacketReader::new(&wire[..], MAX_PACKET_SIZE);

        assert_eq!(reader.next().await.unwrap().packet, ControlPacket::Connect);
        assert_eq!(
            reader.next().await.unwrap().packet,
            ControlPacket::Disconnect
        );
    }

    #[tokio::test]
    async fn resumes_across_split_delivery() {
        let wire = encode_publish("a/b", b"payload-bytes");
        let (mut tx, rx) = tokio::io::duplex(64);
        let mut reader = PacketReader::new(rx, MAX_PACKET_SIZE);

        let (split_at, rest) = wire.split_at(3);
        tx.write_all(split_at).await.unwrap();

        let rest = rest.to_vec();
        let feeder = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            tx.write_all(&rest).await.unwrap();
        });

        let frame = reader.next().await.unwrap();
        assert_eq!(&frame.raw[..], &wire[..]);
        feeder.await.unwrap();
    }

    #[tokio::test]
    async fn eof_is_connection_closed() {
        let mut reader = PacketReader::new(&[][..], MAX_PACKET_SIZE);
        assert!(matches!(
            reader.next().await.unwrap_err(),
            CodecError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn invalid_packet_type_is_malformed() {
        // Packet type 0 is reserved in MQTT v3.1.1.
        let wire = [0x00u8, 0x00];
        let mut reader = PacketReader::new(&wire[..], MAX_PACKET_SIZE);
        assert!(matches!(
            reader.next().await.unwrap_err(),
            CodecError::Malformed(_)
        ));
    }
}
