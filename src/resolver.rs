//! Resolution orchestration.
//!
//! Decides which lookups to try for a requested name and in what order:
//! 1. Onion service discovery (`_tor.<name>` TXT)
//! 2. Direct resolution (A, AAAA, CNAME) unless onion-only
//!
//! The first attempt that does not come back NXDOMAIN decides the outcome.
//! The engine handles the actual I/O, the resolver handles decisions.

use hickory_proto::rr::RecordType;
use tracing::{debug, warn};

use crate::classify::{Outcome, Status, classify};
use crate::engine::{EngineError, ResolutionEngine};
use crate::query::Attempt;
use crate::stats::Stats;

const ONION_SUFFIX: &str = ".onion";

/// Lookups to try for `name`, in precedence order.
///
/// A `.onion` suffix is stripped and forces onion-only mode.
pub fn plan(name: &str, only_onion: bool) -> Vec<Attempt> {
    let (name, only_onion) = match name.strip_suffix(ONION_SUFFIX) {
        Some(stripped) => (stripped, true),
        None => (name, only_onion),
    };

    let mut attempts = vec![Attempt::onion(name)];
    if !only_onion {
        attempts.extend(
            [RecordType::A, RecordType::AAAA, RecordType::CNAME]
                .into_iter()
                .map(|qtype| Attempt::direct(name, qtype)),
        );
    }
    attempts
}

/// Resolver drives attempts against an engine and classifies the answers.
pub struct Resolver<E> {
    engine: E,
    only_onion: bool,
    stats: Stats,
}

impl<E: ResolutionEngine> Resolver<E> {
    pub fn new(engine: E, only_onion: bool) -> Self {
        Self {
            engine,
            only_onion,
            stats: Stats::new(),
        }
    }

    /// Resolve a requested name to exactly one outcome.
    pub async fn resolve(&self, name: &str, stream_id: &str) -> Outcome {
        let outcome = self.run_attempts(name, stream_id).await;
        self.stats.record_outcome(outcome.status);
        outcome
    }

    async fn run_attempts(&self, name: &str, stream_id: &str) -> Outcome {
        for attempt in plan(name, self.only_onion) {
            let outcome = self.try_attempt(&attempt, stream_id).await;

            debug!(
                qname = %attempt.qname,
                qtype = %attempt.qtype,
                status = ?outcome.status,
                detail = %outcome.detail,
                "attempt finished"
            );

            if !outcome.is_nx_domain() {
                return outcome;
            }
        }

        Outcome::failure(Status::NxDomain, format!("{} is not registered", name))
    }

    async fn try_attempt(&self, attempt: &Attempt, stream_id: &str) -> Outcome {
        let query = match attempt.to_message(stream_id) {
            Ok(q) => q,
            Err(e) => {
                warn!(qname = %attempt.qname, error = %e, "cannot build query");
                return Outcome::failure(Status::GenericFail, "Invalid name");
            }
        };

        self.stats.record_attempt();

        match self.engine.resolve(query).await {
            Ok(response) => classify(&response, attempt.parse_onion),
            Err(EngineError::Timeout) => {
                warn!(qname = %attempt.qname, qtype = %attempt.qtype, "engine timed out");
                Outcome::failure(Status::Timeout, "Timed out")
            }
            Err(e) => {
                warn!(qname = %attempt.qname, qtype = %attempt.qtype, error = %e, "engine failed");
                Outcome::failure(Status::GenericFail, "Server failure")
            }
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }
}
