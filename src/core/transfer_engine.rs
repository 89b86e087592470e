//! Transfer engine
//!
//! This module provides the `TransferEngine`, the per-worker loop that moves
//! random amounts between random pairs of accounts.
//!
//! # Protocol
//!
//! For every operation:
//! 1. Draw two distinct ids uniformly from `[0, account_count)`
//! 2. Lock both through `AccountStore::lock_pair` (lower id first)
//! 3. Re-read the source balance under lock; skip if it is not positive
//! 4. Draw an amount from `[1, source]`, debit the source, credit the destination
//! 5. Drop the guards, releasing both locks before the next operation
//!
//! The debit and credit happen while both locks are held, so no other thread
//! can observe the pair mid-transfer and the pair's sum is unchanged.

use super::AccountStore;
use crate::types::{AccountId, SimulationError, Transfer, TransferOutcome, WorkerStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-worker transfer loop
///
/// Each worker owns its random generator; the store is shared.
#[derive(Debug)]
pub struct TransferEngine {
    /// Worker index, used for seeding and logging
    worker_id: usize,

    /// Shared account store
    store: Arc<AccountStore>,

    /// Worker-local random source
    rng: StdRng,
}

impl TransferEngine {
    /// Create a worker seeded from OS entropy
    pub fn new(worker_id: usize, store: Arc<AccountStore>) -> Self {
        Self {
            worker_id,
            store,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a worker with a reproducible random sequence
    ///
    /// The effective seed is `seed + worker_id`, so workers sharing a base
    /// seed still draw different sequences.
    pub fn with_seed(worker_id: usize, store: Arc<AccountStore>, seed: u64) -> Self {
        Self {
            worker_id,
            store,
            rng: StdRng::seed_from_u64(seed.wrapping_add(worker_id as u64)),
        }
    }

    /// Worker index
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Perform exactly `ops` transfer attempts, then return the counters
    ///
    /// # Errors
    ///
    /// Only lock failures (a poisoned account) abort the loop.
    pub fn run(&mut self, ops: u64) -> Result<WorkerStats, SimulationError> {
        let mut stats = WorkerStats::default();

        for _ in 0..ops {
            let outcome = self.transfer_once()?;
            stats.record(&outcome);
        }

        debug!(
            worker = self.worker_id,
            completed = stats.completed,
            skipped = stats.skipped,
            "Worker finished"
        );
        Ok(stats)
    }

    /// Attempt one transfer between a random pair of distinct accounts
    ///
    /// A store with a single account has no distinct pair; every attempt is
    /// then a skip.
    pub fn transfer_once(&mut self) -> Result<TransferOutcome, SimulationError> {
        let count = self.store.account_count();
        if count < 2 {
            return Ok(TransferOutcome::Skipped { from: 0, to: 0 });
        }

        let from = self.rng.gen_range(0..count);
        // Draw from the other count - 1 ids and shift past `from`.
        let mut to = self.rng.gen_range(0..count - 1);
        if to >= from {
            to += 1;
        }

        self.transfer_between(from, to)
    }

    /// Attempt one transfer from `from` to `to`
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if `from == to`
    /// - `UnknownAccount` if either id is outside the store
    /// - `LockPoisoned` if either lock is poisoned
    pub fn transfer_between(
        &mut self,
        from: AccountId,
        to: AccountId,
    ) -> Result<TransferOutcome, SimulationError> {
        let mut guards = self.store.lock_pair(from, to)?;

        let source = guards
            .balance(from)
            .ok_or_else(|| SimulationError::unknown_account(from, self.store.account_count()))?;
        if source <= 0 {
            trace!(worker = self.worker_id, from, to, "Source empty, skipping");
            return Ok(TransferOutcome::Skipped { from, to });
        }

        let amount = self.rng.gen_range(1..=source);
        if let Some(balance) = guards.balance_mut(from) {
            *balance -= amount;
        }
        if let Some(balance) = guards.balance_mut(to) {
            *balance += amount;
        }
        drop(guards);

        Ok(TransferOutcome::Completed(Transfer { from, to, amount }))
    }
}
