//! Transport layer for talking to the upstream DNS server.
//!
//! UDP is tried first; TCP is used when the UDP answer comes back truncated.

pub mod tcp;
pub mod udp;

/// Maximum size of a DNS packet (with some headroom).
pub const MAX_DNS_PACKET_SIZE: usize = 4096;

/// Size of the fixed DNS header.
pub const HEADER_LEN: usize = 12;

/// Read the 16-bit message ID from a wire-format DNS message.
pub fn message_id(packet: &[u8]) -> Option<u16> {
    if packet.len() < HEADER_LEN {
        return None;
    }

    Some(u16::from_be_bytes([packet[0], packet[1]]))
}
