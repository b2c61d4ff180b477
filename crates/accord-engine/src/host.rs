//! Liveness reporting to whoever drives the run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Receives one beat per fully completed subject.
pub trait Heartbeat: Send + Sync {
    fn beat(&self, completed: u64);
}

/// Discards beats.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHeartbeat;

impl Heartbeat for NoHeartbeat {
    fn beat(&self, _completed: u64) {}
}

/// Counts beats. Useful when the total is reported elsewhere.
#[derive(Debug, Default)]
pub struct BeatCounter(AtomicU64);

impl BeatCounter {
    pub fn total(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Heartbeat for BeatCounter {
    fn beat(&self, completed: u64) {
        self.0.fetch_add(completed, Ordering::Relaxed);
    }
}
