use std::net::SocketAddr;
use std::time::Duration;

use hickory_proto::op::Message;
use tracing::{debug, info};

use super::{EngineError, ResolutionEngine};
use crate::transport::{tcp, udp::UdpTransport};

/// Engine that forwards queries to a DNS server fronting the naming backend.
///
/// Typically an ncdns instance on localhost. The stream isolation option
/// travels inside the query, so the server sees it unchanged.
pub struct UpstreamEngine {
    udp: UdpTransport,
    upstream: SocketAddr,
    timeout: Duration,
}

impl UpstreamEngine {
    pub async fn connect(upstream: SocketAddr, timeout: Duration) -> Result<Self, EngineError> {
        let udp = UdpTransport::connect(upstream).await?;

        info!(
            %upstream,
            local = %udp.local_addr()?,
            timeout_ms = timeout.as_millis() as u64,
            "upstream engine ready"
        );

        Ok(Self {
            udp,
            upstream,
            timeout,
        })
    }

    async fn exchange(&self, query: &Message) -> Result<Message, EngineError> {
        let bytes = query.to_vec()?;

        let response = Message::from_vec(&self.udp.exchange(&bytes).await?)?;
        if !response.truncated() {
            return Ok(response);
        }

        debug!(id = query.id(), "UDP response truncated, retrying over TCP");
        let response = Message::from_vec(&tcp::exchange(self.upstream, &bytes).await?)?;

        Ok(response)
    }
}

impl ResolutionEngine for UpstreamEngine {
    async fn resolve(&self, query: Message) -> Result<Message, EngineError> {
        tokio::time::timeout(self.timeout, self.exchange(&query))
            .await
            .map_err(|_| EngineError::Timeout)?
    }
}
