//! UDP transport to the upstream server.
//!
//! The socket is connected to the upstream address, so the kernel already
//! filters datagrams from other peers. Stale answers to earlier queries that
//! timed out can still arrive, so responses are matched on message ID.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

use super::{MAX_DNS_PACKET_SIZE, message_id};

/// UDP socket bound for exchanges with a single upstream server.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind an ephemeral local port and connect it to `upstream`.
    pub async fn connect(upstream: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if upstream.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await?;
        socket.connect(upstream).await?;

        Ok(Self { socket })
    }

    /// Send a query and wait for the datagram answering it.
    pub async fn exchange(&self, query: &[u8]) -> io::Result<Vec<u8>> {
        let id = message_id(query)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "query too short"))?;

        self.socket.send(query).await?;

        let mut buf = vec![0u8; MAX_DNS_PACKET_SIZE];
        loop {
            let len = self.socket.recv(&mut buf).await?;

            match message_id(&buf[..len]) {
                Some(got) if got == id => {
                    buf.truncate(len);
                    return Ok(buf);
                }
                Some(got) => debug!(expected = id, got, "discarding stale UDP response"),
                None => debug!(len, "discarding runt UDP datagram"),
            }
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}
