//! Prop279 bridge orchestration.
//!
//! Reads commands, runs resolutions and writes status lines, one request at
//! a time. Runs until the input fails or closes.

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, warn};

use crate::classify::Status;
use crate::command::{Command, CommandReader};
use crate::engine::ResolutionEngine;
use crate::error::BridgeError;
use crate::output::LineWriter;
use crate::resolver::Resolver;

pub struct Bridge<E, R, W> {
    resolver: Resolver<E>,
    reader: CommandReader<R>,
    writer: LineWriter<W>,
}

impl<E, R, W> Bridge<E, R, W>
where
    E: ResolutionEngine,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(resolver: Resolver<E>, reader: R, writer: W) -> Self {
        Self {
            resolver,
            reader: CommandReader::new(reader),
            writer: LineWriter::new(writer),
        }
    }

    /// Announce the protocol version and serve commands.
    ///
    /// Only returns on a fatal error; end of input is reported as
    /// [`BridgeError::InputClosed`].
    pub async fn run(&mut self) -> Result<(), BridgeError> {
        self.writer.init().await.map_err(BridgeError::Write)?;

        let result = self.serve().await;
        self.log_summary();
        result
    }

    async fn serve(&mut self) -> Result<(), BridgeError> {
        loop {
            let line = match self.reader.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Err(BridgeError::InputClosed),
                Err(e) => return Err(BridgeError::Read(e)),
            };

            self.handle_line(&line).await?;
        }
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), BridgeError> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                self.resolver.stats().record_dropped();
                return Ok(());
            }
        };

        match command {
            Command::Resolve {
                query_id,
                name,
                stream_id,
            } => {
                if stream_id.is_empty() {
                    warn!(
                        "Missing stream isolation ID from Prop279 client; stream isolation won't work properly. Maybe your Prop279 client is outdated?"
                    );
                }

                self.resolver.stats().record_request();
                let outcome = self.resolver.resolve(&name, &stream_id).await;
                self.writer
                    .resolved(query_id, &outcome)
                    .await
                    .map_err(BridgeError::Write)?;
            }
            Command::Cancel { query_id } => {
                // Resolution is synchronous, so nothing is ever in flight here.
                self.resolver.stats().record_cancel();
                self.writer
                    .canceled(query_id)
                    .await
                    .map_err(BridgeError::Write)?;
            }
            Command::Ignored => {}
        }

        Ok(())
    }

    fn log_summary(&self) {
        let stats = self.resolver.stats().snapshot();
        info!(
            requests = stats.requests,
            cancels = stats.cancels,
            dropped = stats.dropped,
            attempts = stats.attempts,
            success = stats.outcome(Status::Success),
            generic_fail = stats.outcome(Status::GenericFail),
            not_in_zone = stats.outcome(Status::NotInZone),
            nx_domain = stats.outcome(Status::NxDomain),
            timeout = stats.outcome(Status::Timeout),
            "bridge stopped"
        );
    }

    #[cfg(test)]
    pub(crate) fn resolver(&self) -> &Resolver<E> {
        &self.resolver
    }
}
