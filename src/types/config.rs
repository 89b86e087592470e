//! Simulation configuration
//!
//! Controls the size of the ledger, the number of workers and how often the
//! auditor checks the conservation invariant.

use super::account::Balance;
use super::error::SimulationError;
use std::time::Duration;

/// Configuration for one simulation run
///
/// Built from CLI arguments (or directly in tests) and validated before any
/// thread is spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of accounts in the store
    pub account_count: usize,
    /// Starting balance of every account
    pub initial_balance: Balance,
    /// Number of concurrent transfer workers
    pub thread_count: usize,
    /// Operations each worker performs before returning
    pub ops_per_thread: u64,
    /// Auditor polling period
    pub check_interval: Duration,
    /// Base seed for the workers' random generators, entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            account_count: 100,
            initial_balance: 1000,
            thread_count: num_cpus::get(),
            ops_per_thread: 100_000,
            check_interval: Duration::from_millis(500),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidConfig` if a count is zero, the
    /// initial balance is negative or the interval is zero, and
    /// `SimulationError::TotalOverflow` if the initial total does not fit in
    /// a balance.
    pub fn new(
        account_count: usize,
        initial_balance: Balance,
        thread_count: usize,
        ops_per_thread: u64,
        check_interval: Duration,
    ) -> Result<Self, SimulationError> {
        let config = Self {
            account_count,
            initial_balance,
            thread_count,
            ops_per_thread,
            check_interval,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Use a fixed base seed for the workers' random generators
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.account_count == 0 {
            return Err(SimulationError::invalid_config(
                "accounts",
                "must be greater than 0",
            ));
        }
        if self.initial_balance < 0 {
            return Err(SimulationError::invalid_config(
                "initial_balance",
                "must not be negative",
            ));
        }
        if self.thread_count == 0 {
            return Err(SimulationError::invalid_config(
                "threads",
                "must be greater than 0",
            ));
        }
        if self.check_interval.is_zero() {
            return Err(SimulationError::invalid_config(
                "check_interval_ms",
                "must be greater than 0",
            ));
        }
        self.initial_total()?;
        Ok(())
    }

    /// `account_count * initial_balance`, checked for overflow
    pub fn initial_total(&self) -> Result<Balance, SimulationError> {
        Balance::try_from(self.account_count)
            .ok()
            .and_then(|count| count.checked_mul(self.initial_balance))
            .ok_or(SimulationError::TotalOverflow {
                accounts: self.account_count,
                initial_balance: self.initial_balance,
            })
    }

    /// Operations performed by all workers together
    pub fn total_ops(&self) -> u64 {
        self.thread_count as u64 * self.ops_per_thread
    }
}
