//! Account-related types for the bank ledger simulator
//!
//! This module defines the Account cell: a balance guarded by its own
//! exclusive lock.

use super::error::SimulationError;
use std::sync::{Mutex, MutexGuard};

/// Account identifier
///
/// Index of the account inside the store. Ascending ids define the global
/// lock order.
pub type AccountId = usize;

/// Account balance in whole units
pub type Balance = i64;

/// A single balance cell with its own mutual-exclusion lock
///
/// The balance is only reachable through the lock, and the lock is only
/// handed out by `AccountStore::lock_ordered`, so every read or write of a
/// balance happens while the ordering protocol is respected.
#[derive(Debug)]
pub struct Account {
    /// Position of this account in the store
    id: AccountId,

    /// Current balance, never negative when observed under the lock
    balance: Mutex<Balance>,
}

impl Account {
    /// Create a new account holding `balance`
    pub fn new(id: AccountId, balance: Balance) -> Self {
        Account {
            id,
            balance: Mutex::new(balance),
        }
    }

    /// The account's id (its index in the store)
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Block until this account's lock is granted
    ///
    /// Crate-private: callers outside the store must go through the ordered
    /// acquisition helper.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Balance>, SimulationError> {
        self.balance
            .lock()
            .map_err(|_| SimulationError::lock_poisoned(self.id))
    }
}
