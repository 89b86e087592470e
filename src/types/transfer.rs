//! Transfer-related types for the bank ledger simulator
//!
//! Transfers are transient: they are produced by a worker, counted into its
//! statistics and then dropped. Nothing here is persisted.

use super::account::{AccountId, Balance};

/// A completed value movement between two distinct accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Account that was debited
    pub from: AccountId,

    /// Account that was credited
    pub to: AccountId,

    /// Amount moved, `1 <= amount <= source balance` at the time both locks were held
    pub amount: Balance,
}

/// Result of a single transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both locks were held and `amount` moved from `from` to `to`
    Completed(Transfer),

    /// The source balance was not positive once re-read under lock
    ///
    /// This is an expected result of contention, not an error.
    Skipped {
        /// The would-be source account
        from: AccountId,
        /// The would-be destination account
        to: AccountId,
    },
}

impl TransferOutcome {
    /// Whether value actually moved
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed(_))
    }
}

/// Per-worker transfer counters
///
/// `completed + skipped` always equals the number of operations the worker
/// performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Transfers that moved value
    pub completed: u64,

    /// Operations that were no-ops because the source was empty
    pub skipped: u64,

    /// Sum of all amounts moved
    pub volume: u128,
}

impl WorkerStats {
    /// Count one transfer outcome
    pub fn record(&mut self, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Completed(transfer) => {
                self.completed += 1;
                self.volume += transfer.amount.unsigned_abs() as u128;
            }
            TransferOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Fold another worker's counters into this one
    pub fn merge(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.skipped += other.skipped;
        self.volume += other.volume;
    }

    /// Total operations performed
    pub fn operations(&self) -> u64 {
        self.completed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_completed_and_skipped() {
        let mut stats = WorkerStats::default();

        stats.record(&TransferOutcome::Completed(Transfer {
            from: 0,
            to: 1,
            amount: 40,
        }));
        stats.record(&TransferOutcome::Skipped { from: 1, to: 0 });
        stats.record(&TransferOutcome::Completed(Transfer {
            from: 1,
            to: 2,
            amount: 2,
        }));

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.volume, 42);
        assert_eq!(stats.operations(), 3);
    }

    #[test]
    fn test_merge_sums_counters() {
        let mut a = WorkerStats {
            completed: 3,
            skipped: 1,
            volume: 10,
        };
        let b = WorkerStats {
            completed: 2,
            skipped: 4,
            volume: 5,
        };

        a.merge(&b);

        assert_eq!(
            a,
            WorkerStats {
                completed: 5,
                skipped: 5,
                volume: 15
            }
        );
    }
}
