//! Prop279 command parsing.
//!
//! Commands arrive one per line on stdin. Prop279 Sec. 2.9.1 specifies LF as
//! the line ending even on platforms where CRLF is typical, so we split on
//! `\n` only and let whitespace splitting swallow any stray `\r`.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// A parsed Prop279 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `RESOLVE <queryID> <name> [streamID]`
    Resolve {
        query_id: i64,
        name: String,
        stream_id: String,
    },
    /// `CANCEL <queryID>`
    Cancel { query_id: i64 },
    /// Empty line, unknown verb, or a `CANCEL` without an ID.
    Ignored,
}

/// A line that looked like a command but could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Not enough arguments to RESOLVE command.")]
    NotEnoughArguments,

    #[error("Query ID '{0}' was not an integer.")]
    InvalidQueryId(String),
}

impl Command {
    /// Parse a single protocol line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.first().copied() {
            Some("RESOLVE") => {
                if words.len() < 3 {
                    return Err(CommandError::NotEnoughArguments);
                }

                Ok(Command::Resolve {
                    query_id: parse_query_id(words[1])?,
                    name: words[2].to_string(),
                    stream_id: words.get(3).copied().unwrap_or_default().to_string(),
                })
            }
            Some("CANCEL") => match words.get(1) {
                Some(id) => Ok(Command::Cancel {
                    query_id: parse_query_id(id)?,
                }),
                None => Ok(Command::Ignored),
            },
            _ => Ok(Command::Ignored),
        }
    }
}

fn parse_query_id(word: &str) -> Result<i64, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidQueryId(word.to_string()))
}

/// Reads LF-terminated lines from the Prop279 client.
pub struct CommandReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> CommandReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }

    /// Read the next line, without its terminator.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A trailing fragment
    /// with no LF counts as end of input and is never returned. Bytes that
    /// are not UTF-8 are replaced rather than failing the read, since stream
    /// isolation IDs are opaque to us.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();

        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }

        if self.buf.pop() != Some(b'\n') {
            warn!(len = n, "input ended mid-line, discarding unterminated command");
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
