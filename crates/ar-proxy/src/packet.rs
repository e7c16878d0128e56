//! Control packet classification for the packet pump.
//!
//! Collapses the full MQTT v4 packet space into the closed set the relay
//! dispatches on, keeping the original wire bytes alongside so relays are
//! byte-for-byte.

use bytes::Bytes;
use rumqttc::mqttbytes::v4;

/// Wire encoding of an MQTT v3.1.1 DISCONNECT packet.
///
/// Written downstream when a publish is rejected by the handler.
pub const DISCONNECT_FRAME: [u8; 2] = [0xE0, 0x00];

/// A classified MQTT control packet.
///
/// Closed variant set: packet kinds the relay does not dispatch on are
/// collapsed into `Other` and passed through opaquely.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPacket {
    /// Client connection request.
    Connect,
    /// Application message for a topic.
    Publish { topic: String, payload: Bytes },
    /// Graceful session end.
    Disconnect,
    /// Any other control packet; relayed without handler dispatch.
    Other { kind: &'static str },
}

/// One decoded control packet paired with its original wire bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    pub packet: ControlPacket,
    pub raw: Bytes,
}

/// Classify a decoded v4 packet into a `ControlPacket`.
///
/// The match is exhaustive on purpose: a new packet kind in the codec is
/// a compile-time decision here, not a silent fall-through.
pub fn classify(packet: v4::Packet) -> ControlPacket {
    match packet {
        v4::Packet::Connect(_) => ControlPacket::Connect,
        v4::Packet::Publish(publish) => ControlPacket::Publish {
            topic: publish.topic,
            payload: publish.payload,
        },
        v4::Packet::Disconnect => ControlPacket::Disconnect,
        v4::Packet::ConnAck(_) => ControlPacket::Other { kind: "connack" },
        v4::Packet::PubAck(_) => ControlPacket::Other { kind: "puback" },
        v4::Packet::PubRec(_) => ControlPacket::Other { kind: "pubrec" },
        v4::Packet::PubRel(_) => ControlPacket::Other { kind: "pubrel" },
        v4::Packet::PubComp(_) => ControlPacket::Other { kind: "pubcomp" },
        v4::Packet::Subscribe(_) => ControlPacket::Other { kind: "subscribe" },
        v4::Packet::SubAck(_) => ControlPacket::Other { kind: "suback" },
        v4::Packet::Unsubscribe(_) => ControlPacket::Other { kind: "unsubscribe" },
        v4::Packet::UnsubAck(_) => ControlPacket::Other { kind: "unsuback" },
        v4::Packet::PingReq => ControlPacket::Other { kind: "pingreq" },
        v4::Packet::PingResp => ControlPacket::Other { kind: "pingresp" },
    }
}
