//! Prop279 status lines.

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::classify::Outcome;

/// Protocol version advertised on startup.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn init_line() -> String {
    format!("INIT {} 0", PROTOCOL_VERSION)
}

pub fn resolved_line(query_id: i64, outcome: &Outcome) -> String {
    format!(
        "RESOLVED {} {} {}",
        query_id,
        outcome.status.code(),
        outcome.detail
    )
}

pub fn canceled_line(query_id: i64) -> String {
    format!("CANCELED {}", query_id)
}

/// Writes LF-terminated lines, flushing after each one so the client never
/// waits on a buffered reply.
pub struct LineWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn init(&mut self) -> io::Result<()> {
        self.write_line(&init_line()).await
    }

    pub async fn resolved(&mut self, query_id: i64, outcome: &Outcome) -> io::Result<()> {
        self.write_line(&resolved_line(query_id, outcome)).await
    }

    pub async fn canceled(&mut self, query_id: i64) -> io::Result<()> {
        self.write_line(&canceled_line(query_id)).await
    }

    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        self.inner.write_all(&buf).await?;
        self.inner.flush().await
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> &W {
        &self.inner
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}
