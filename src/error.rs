//! Fatal bridge errors. Any of these ends the process with exit status 3.

use std::io;

use crate::config::ConfigError;
use crate::engine::EngineError;

/// Exit status for every fatal error.
pub const EXIT_FAILURE: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Couldn't create server: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Couldn't read stdin: {0}")]
    Read(#[source] io::Error),

    #[error("Couldn't read stdin: EOF")]
    InputClosed,

    #[error("Couldn't write stdout: {0}")]
    Write(#[source] io::Error),
}
