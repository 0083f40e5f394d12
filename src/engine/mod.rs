//! Resolution engines.
//!
//! An engine takes a synthesized query and returns exactly one response
//! message. Whatever caching, zone logic or backend RPC happens behind it is
//! the engine's business.

use std::future::Future;
use std::io;

use hickory_proto::ProtoError;
use hickory_proto::op::Message;

mod upstream;

#[cfg(test)]
pub(crate) mod scripted;

pub use upstream::UpstreamEngine;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("timed out waiting for upstream")]
    Timeout,

    #[error("upstream I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed DNS message: {0}")]
    Proto(#[from] ProtoError),
}

/// Resolves one query into one response.
pub trait ResolutionEngine {
    fn resolve(&self, query: Message) -> impl Future<Output = Result<Message, EngineError>>;
}
