//! TCP transport to the upstream server.
//!
//! Used when a UDP answer is truncated. Each exchange opens a fresh
//! connection. TCP DNS messages are prefixed with a 2-byte length.

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Send one query over a new TCP connection and return the response.
///
/// `query` and the returned message are bare DNS messages; the length prefix
/// is added and stripped here.
pub async fn exchange(upstream: SocketAddr, query: &[u8]) -> io::Result<Vec<u8>> {
    let len = u16::try_from(query.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "query too large for TCP"))?;

    let mut stream = TcpStream::connect(upstream).await?;

    let mut framed = Vec::with_capacity(query.len() + 2);
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(query);
    stream.write_all(&framed).await?;

    read_dns_message(&mut stream).await
}

/// Read a length-prefixed DNS message from a TCP stream.
pub async fn read_dns_message(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let msg_len = u16::from_be_bytes(len_buf) as usize;
    let mut buf = vec![0u8; msg_len];
    stream.read_exact(&mut buf).await?;

    Ok(buf)
}
