use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::debug;

use super::hashing::{hash_proof_candidate, meets_difficulty};
use crate::error::NodeError;

/// How many candidates are tried between deadline/cancel checks.
const CHECK_INTERVAL: u64 = 1024;

/// Raises its flag when dropped, so a search watching the flag stops once
/// whoever started it goes away.
#[derive(Debug, Default)]
pub struct CancelOnDrop {
    flag: Arc<AtomicBool>,
}

impl CancelOnDrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// Proof-of-work search over `candidate² - previous²` digests.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    difficulty: u32,
    time_limit: Option<Duration>,
}

impl ProofOfWork {
    pub fn new(difficulty: u32, time_limit: Option<Duration>) -> Self {
        Self {
            difficulty,
            time_limit,
        }
    }

    /// Whether `candidate` is an acceptable proof following `previous`.
    pub fn accepts(&self, candidate: u64, previous: u64) -> bool {
        meets_difficulty(&hash_proof_candidate(candidate, previous), self.difficulty)
    }

    /// Smallest proof >= 1 accepted after `previous`, bounded by the time limit.
    pub fn solve(&self, previous: u64) -> Result<u64, NodeError> {
        self.solve_until(previous, &AtomicBool::new(false))
    }

    /// Like [`solve`](Self::solve), but also gives up once `cancel` is raised.
    pub fn solve_until(&self, previous: u64, cancel: &AtomicBool) -> Result<u64, NodeError> {
        let started = Instant::now();
        for candidate in 1..=u64::MAX {
            if candidate % CHECK_INTERVAL == 0 {
                if cancel.load(Ordering::Relaxed) {
                    return Err(NodeError::MiningCancelled);
                }
                if let Some(limit) = self.time_limit {
                    if started.elapsed() >= limit {
                        return Err(NodeError::MiningTimedOut { limit });
                    }
                }
            }
            if self.accepts(candidate, previous) {
                debug!(
                    "POW - proof {} found after {:?} (previous={}, difficulty={})",
                    candidate,
                    started.elapsed(),
                    previous,
                    self.difficulty
                );
                return Ok(candidate);
            }
        }
        Err(NodeError::ProofSpaceExhausted)
    }
}
