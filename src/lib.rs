//! prop279-bridge - Tor Prop279 resolver backed by a DNS engine.
//!
//! This library exposes the protocol pieces for the binary, tests and benchmarks.

pub mod bridge;
pub mod classify;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod output;
pub mod query;
pub mod resolver;
pub mod stats;
pub mod transport;
