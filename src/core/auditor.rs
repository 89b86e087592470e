//! Global auditor
//!
//! This module provides the stop-the-world audit pass and the periodic
//! auditor loop that runs it on its own thread.
//!
//! # Audit Pass
//!
//! 1. Lock every account in ascending id order (the same order workers use)
//! 2. Sum every balance; with all locks held no transfer can be in flight,
//!    so the sum is a linearizable snapshot
//! 3. Compare against the store's initial total
//! 4. Release every lock in descending id order
//!
//! Only the read-and-sum happens under the locks; the comparison and logging
//! run after release.

use super::AccountStore;
use crate::types::{AuditSnapshot, AuditSummary, Balance, SimulationError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Sleep quantum between shutdown checks
pub const POLL_QUANTUM: Duration = Duration::from_millis(10);

/// Run one full-lock audit pass over `store`
///
/// # Errors
///
/// Returns `LockPoisoned` if any account lock is poisoned.
pub fn audit(store: &AccountStore) -> Result<AuditSnapshot, SimulationError> {
    let sum = {
        let guards = store.lock_all()?;
        guards.sum()
    };

    // A sum outside the balance range can only come from a broken invariant.
    let total = Balance::try_from(sum).unwrap_or(if sum < 0 {
        Balance::MIN
    } else {
        Balance::MAX
    });

    Ok(AuditSnapshot {
        total,
        expected: store.initial_total(),
    })
}

/// Log one audit result
///
/// A broken invariant is a correctness failure and is always logged at
/// error level.
pub fn report(label: &str, snapshot: &AuditSnapshot) {
    if snapshot.is_conserved() {
        info!(
            audit = label,
            total = snapshot.total,
            expected = snapshot.expected,
            verdict = snapshot.verdict(),
            "Audit pass"
        );
    } else {
        error!(
            audit = label,
            total = snapshot.total,
            expected = snapshot.expected,
            verdict = snapshot.verdict(),
            "Conservation invariant broken"
        );
    }
}

/// Signal for stopping the periodic auditor
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    /// Flag to indicate shutdown requested
    shutdown: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
        }
    }

    /// Request shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown was requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// Periodic auditor
///
/// Wakes every `interval`, runs one audit pass and logs it, until shutdown is
/// requested.
#[derive(Debug, Clone)]
pub struct Auditor {
    store: Arc<AccountStore>,
    interval: Duration,
}

impl Auditor {
    pub fn new(store: Arc<AccountStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Audit every `interval` until `shutdown` is requested
    ///
    /// Waits in `POLL_QUANTUM` slices so a shutdown request is noticed within
    /// one quantum. When shutdown is seen the loop exits without a final
    /// audit; the orchestrator runs that one itself.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if an audit pass hits a poisoned lock.
    pub fn run_periodic(&self, shutdown: &ShutdownSignal) -> Result<AuditSummary, SimulationError> {
        let mut summary = AuditSummary::default();

        while self.wait_interval(shutdown) {
            let snapshot = audit(&self.store)?;
            summary.record(&snapshot);
            report("periodic", &snapshot);
        }

        debug!(
            passes = summary.passes,
            broken = summary.broken,
            "Auditor stopped"
        );
        Ok(summary)
    }

    /// Sleep one interval; returns false if shutdown was requested meanwhile
    fn wait_interval(&self, shutdown: &ShutdownSignal) -> bool {
        let deadline = Instant::now() + self.interval;

        loop {
            if shutdown.is_shutdown_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(POLL_QUANTUM.min(deadline - now));
        }
    }
}
