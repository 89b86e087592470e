//! Error types for the bank ledger simulator
//!
//! This module defines all error types that can occur while configuring or
//! running a simulation. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: Non-positive counts, overflowing initial total
//! - **Lock Errors**: Unknown or duplicate account ids, poisoned account locks
//! - **Thread Errors**: Worker or auditor threads that panicked, runtime failures
//! - **Output Errors**: I/O and CSV failures while dumping balances
//! - **Invariant Violations**: An audit observed a total different from the initial total

use super::account::{AccountId, Balance};
use thiserror::Error;

/// Main error type for the simulator
///
/// Each variant includes the context needed to diagnose the failure.
/// None of them is transient: a simulation that hits one of these errors
/// stops rather than retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A configuration value is out of range
    ///
    /// Raised before any thread is spawned.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending setting
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// `account_count * initial_balance` does not fit in a balance
    #[error("Initial total overflows for {accounts} accounts of {initial_balance} each")]
    TotalOverflow {
        /// Configured number of accounts
        accounts: usize,
        /// Configured balance per account
        initial_balance: Balance,
    },

    /// A lock was requested for an account outside the store
    #[error("Account {account} does not exist (store holds {count} accounts)")]
    UnknownAccount {
        /// The requested account id
        account: AccountId,
        /// Number of accounts in the store
        count: usize,
    },

    /// The same account was requested twice in one acquisition
    ///
    /// Re-locking a held `Mutex` would deadlock the calling thread.
    #[error("Account {account} requested more than once in a single acquisition")]
    DuplicateAccount {
        /// The repeated account id
        account: AccountId,
    },

    /// An account lock was poisoned by a thread that panicked while holding it
    #[error("Lock for account {account} is poisoned")]
    LockPoisoned {
        /// The account whose lock is poisoned
        account: AccountId,
    },

    /// A worker or auditor thread panicked
    #[error("Thread '{name}' panicked")]
    ThreadPanicked {
        /// Name of the thread or task
        name: String,
    },

    /// The async runtime could not be built or a task failed to complete
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },

    /// I/O error occurred while writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV serialization error occurred while writing balances
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error
        message: String,
    },

    /// The conservation invariant does not hold
    #[error("Conservation invariant broken: total {total}, expected {expected}")]
    InvariantViolation {
        /// Sum observed by the audit
        total: Balance,
        /// Initial total of the store
        expected: Balance,
    },
}

impl From<std::io::Error> for SimulationError {
    fn from(error: std::io::Error) -> Self {
        SimulationError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SimulationError {
    fn from(error: csv::Error) -> Self {
        SimulationError::Csv {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SimulationError {
    /// Create an InvalidConfig error
    pub fn invalid_config(field: &str, reason: &str) -> Self {
        SimulationError::InvalidConfig {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId, count: usize) -> Self {
        SimulationError::UnknownAccount { account, count }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(account: AccountId) -> Self {
        SimulationError::LockPoisoned { account }
    }

    /// Create a ThreadPanicked error
    pub fn thread_panicked(name: &str) -> Self {
        SimulationError::ThreadPanicked {
            name: name.to_string(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl std::fmt::Display) -> Self {
        SimulationError::Runtime {
            message: message.to_string(),
        }
    }
}
