//! Statistics tracking for the bridge.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::classify::Status;

/// Counters for requests handled since startup.
pub struct Stats {
    pub requests: AtomicU64,
    pub cancels: AtomicU64,
    pub dropped: AtomicU64,
    pub attempts: AtomicU64,
    /// Final outcome per status, indexed by status code.
    outcomes: [AtomicU64; 5],
}

impl Stats {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            cancels: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            outcomes: Default::default(),
        }
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancel(&self) {
        self.cancels.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, status: Status) {
        self.outcomes[status.code() as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cancels: self.cancels.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            outcomes: Status::ALL.map(|s| self.outcomes[s.code() as usize].load(Ordering::Relaxed)),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub cancels: u64,
    pub dropped: u64,
    pub attempts: u64,
    pub outcomes: [u64; 5],
}

impl StatsSnapshot {
    pub fn outcome(&self, status: Status) -> u64 {
        self.outcomes[status.code() as usize]
    }
}
