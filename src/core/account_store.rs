//! Account store
//!
//! This module provides the `AccountStore`: a fixed-length, ordered sequence
//! of accounts, each with its own lock, shared by every worker and the auditor.
//!
//! # Lock Ordering
//!
//! Account ids define a total order over all locks. Every code path that
//! needs more than one account goes through [`AccountStore::lock_ordered`]
//! (or its `lock_pair`/`lock_all` wrappers), which always acquires in
//! ascending id order. Two threads contending for overlapping sets of
//! accounts therefore request the shared locks in the same relative order and
//! no cycle can form in the wait-for graph.
//!
//! Locks held through an [`OrderedGuards`] are released in descending id
//! order when the guards are dropped.

use super::traits::LockObserver;
use crate::types::{Account, AccountId, Balance, SimulationConfig, SimulationError};
use std::fmt;
use std::sync::{Arc, MutexGuard};

/// Fixed set of accounts shared by all simulation threads
pub struct AccountStore {
    /// Accounts indexed by id; order is the global lock order
    accounts: Vec<Account>,

    /// `accounts.len() * initial_balance`, fixed at construction
    initial_total: Balance,

    /// Optional hook notified around every lock operation
    observer: Option<Arc<dyn LockObserver>>,
}

impl AccountStore {
    /// Create a store of `account_count` accounts holding `initial_balance` each
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty store or a negative balance and
    /// `TotalOverflow` if the initial total does not fit in a balance.
    pub fn new(account_count: usize, initial_balance: Balance) -> Result<Self, SimulationError> {
        if account_count == 0 {
            return Err(SimulationError::invalid_config(
                "accounts",
                "must be greater than 0",
            ));
        }
        if initial_balance < 0 {
            return Err(SimulationError::invalid_config(
                "initial_balance",
                "must not be negative",
            ));
        }

        let initial_total = Balance::try_from(account_count)
            .ok()
            .and_then(|count| count.checked_mul(initial_balance))
            .ok_or(SimulationError::TotalOverflow {
                accounts: account_count,
                initial_balance,
            })?;

        let accounts = (0..account_count)
            .map(|id| Account::new(id, initial_balance))
            .collect();

        Ok(AccountStore {
            accounts,
            initial_total,
            observer: None,
        })
    }

    /// Create a store sized by a simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Self::new(config.account_count, config.initial_balance)
    }

    /// Install a lock observer
    pub fn with_observer(mut self, observer: Arc<dyn LockObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get the account at `id`
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Number of accounts in the store
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Sum of all balances at construction time
    pub fn initial_total(&self) -> Balance {
        self.initial_total
    }

    /// Lock two distinct accounts, lower id first
    pub fn lock_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<OrderedGuards<'_>, SimulationError> {
        self.lock_ordered(&[a, b])
    }

    /// Lock every account, from id 0 up to the last one
    pub fn lock_all(&self) -> Result<OrderedGuards<'_>, SimulationError> {
        self.acquire_ascending(0..self.accounts.len())
    }

    /// Lock an arbitrary set of distinct accounts in ascending id order
    ///
    /// The ids may be given in any order; they are sorted before the first
    /// lock is requested.
    ///
    /// # Errors
    ///
    /// - `UnknownAccount` if an id is outside the store
    /// - `DuplicateAccount` if an id appears twice
    /// - `LockPoisoned` if a lock was poisoned; locks already taken are released
    pub fn lock_ordered(&self, ids: &[AccountId]) -> Result<OrderedGuards<'_>, SimulationError> {
        let mut order = ids.to_vec();
        order.sort_unstable();

        if let Some(&highest) = order.last() {
            if highest >= self.accounts.len() {
                return Err(SimulationError::unknown_account(
                    highest,
                    self.accounts.len(),
                ));
            }
        }
        if let Some(pair) = order.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SimulationError::DuplicateAccount { account: pair[0] });
        }

        self.acquire_ascending(order)
    }

    /// Read every balance under a full-lock snapshot
    pub fn snapshot(&self) -> Result<Vec<Balance>, SimulationError> {
        let guards = self.lock_all()?;
        Ok(guards.balances().map(|(_, balance)| balance).collect())
    }

    /// Shared acquisition helper; `ids` must already be ascending, distinct and in range
    fn acquire_ascending<I>(&self, ids: I) -> Result<OrderedGuards<'_>, SimulationError>
    where
        I: IntoIterator<Item = AccountId>,
    {
        let ids = ids.into_iter();
        let mut guards = OrderedGuards {
            guards: Vec::with_capacity(ids.size_hint().0),
            observer: self.observer.as_deref(),
        };

        for id in ids {
            if let Some(observer) = guards.observer {
                observer.before_acquire(id);
            }
            // On error `guards` is dropped, releasing what was already taken.
            let guard = self.accounts[id].lock()?;
            guards.guards.push((id, guard));
        }

        Ok(guards)
    }
}

impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore")
            .field("account_count", &self.accounts.len())
            .field("initial_total", &self.initial_total)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

/// A set of account locks held in ascending id order
///
/// Dropping the guards releases every lock in descending id order.
pub struct OrderedGuards<'a> {
    guards: Vec<(AccountId, MutexGuard<'a, Balance>)>,
    observer: Option<&'a dyn LockObserver>,
}

impl<'a> OrderedGuards<'a> {
    /// Number of locks held
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no lock is held
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Balance of a held account
    pub fn balance(&self, id: AccountId) -> Option<Balance> {
        self.position(id).map(|pos| *self.guards[pos].1)
    }

    /// Mutable balance of a held account
    pub fn balance_mut(&mut self, id: AccountId) -> Option<&mut Balance> {
        let pos = self.position(id)?;
        Some(&mut *self.guards[pos].1)
    }

    /// Held accounts and their balances, ascending by id
    pub fn balances(&self) -> impl Iterator<Item = (AccountId, Balance)> + '_ {
        self.guards.iter().map(|(id, guard)| (*id, **guard))
    }

    /// Sum of every held balance, without overflow
    pub fn sum(&self) -> i128 {
        self.guards.iter().map(|(_, guard)| **guard as i128).sum()
    }

    fn position(&self, id: AccountId) -> Option<usize> {
        self.guards
            .binary_search_by_key(&id, |(held, _)| *held)
            .ok()
    }
}

impl Drop for OrderedGuards<'_> {
    fn drop(&mut self) {
        while let Some((id, guard)) = self.guards.pop() {
            drop(guard);
            if let Some(observer) = self.observer {
                observer.after_release(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    /// Records every lock event in the order it happened
    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<(char, AccountId)>>,
    }

    impl LockObserver for EventLog {
        fn before_acquire(&self, account: AccountId) {
            self.events.lock().unwrap().push(('A', account));
        }

        fn after_release(&self, account: AccountId) {
            self.events.lock().unwrap().push(('R', account));
        }
    }

    #[test]
    fn test_new_initializes_every_account() {
        let store = AccountStore::new(4, 100).unwrap();

        assert_eq!(store.account_count(), 4);
        assert_eq!(store.initial_total(), 400);
        assert_eq!(store.snapshot().unwrap(), vec![100, 100, 100, 100]);
        assert_eq!(store.get(3).map(Account::id), Some(3));
        assert!(store.get(4).is_none());
    }

    #[rstest]
    #[case::empty(0, 10)]
    #[case::negative(3, -5)]
    fn test_new_rejects_invalid_store(#[case] count: usize, #[case] balance: Balance) {
        assert!(matches!(
            AccountStore::new(count, balance),
            Err(SimulationError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_new_rejects_overflowing_total() {
        assert!(matches!(
            AccountStore::new(3, Balance::MAX / 2),
            Err(SimulationError::TotalOverflow { .. })
        ));
    }

    #[rstest]
    #[case::ascending(&[1, 3], vec![('A', 1), ('A', 3), ('R', 3), ('R', 1)])]
    #[case::descending(&[3, 1], vec![('A', 1), ('A', 3), ('R', 3), ('R', 1)])]
    #[case::shuffled(&[2, 0, 3], vec![('A', 0), ('A', 2), ('A', 3), ('R', 3), ('R', 2), ('R', 0)])]
    fn test_lock_ordered_acquires_ascending_and_releases_descending(
        #[case] ids: &[AccountId],
        #[case] expected: Vec<(char, AccountId)>,
    ) {
        let log = Arc::new(EventLog::default());
        let store = AccountStore::new(4, 10)
            .unwrap()
            .with_observer(Arc::clone(&log) as Arc<dyn LockObserver>);

        let guards = store.lock_ordered(ids).unwrap();
        assert_eq!(guards.len(), ids.len());
        drop(guards);

        assert_eq!(*log.events.lock().unwrap(), expected);
    }

    #[test]
    fn test_lock_all_walks_every_account() {
        let log = Arc::new(EventLog::default());
        let store = AccountStore::new(3, 7)
            .unwrap()
            .with_observer(Arc::clone(&log) as Arc<dyn LockObserver>);

        let guards = store.lock_all().unwrap();
        assert_eq!(guards.sum(), 21);
        drop(guards);

        assert_eq!(
            *log.events.lock().unwrap(),
            vec![('A', 0), ('A', 1), ('A', 2), ('R', 2), ('R', 1), ('R', 0)]
        );
    }

    #[test]
    fn test_lock_ordered_rejects_unknown_account() {
        let store = AccountStore::new(2, 10).unwrap();

        assert_eq!(
            store.lock_pair(0, 5).err(),
            Some(SimulationError::UnknownAccount {
                account: 5,
                count: 2
            })
        );
    }

    #[test]
    fn test_lock_ordered_rejects_duplicate_account() {
        let store = AccountStore::new(2, 10).unwrap();

        assert_eq!(
            store.lock_pair(1, 1).err(),
            Some(SimulationError::DuplicateAccount { account: 1 })
        );
    }

    #[test]
    fn test_guards_expose_held_balances() {
        let store = AccountStore::new(4, 50).unwrap();

        {
            let mut guards = store.lock_pair(2, 0).unwrap();
            *guards.balance_mut(2).unwrap() -= 20;
            *guards.balance_mut(0).unwrap() += 20;

            assert_eq!(guards.balance(0), Some(70));
            assert_eq!(guards.balance(2), Some(30));
            assert_eq!(guards.balance(1), None);
            assert!(guards.balance_mut(3).is_none());
            assert_eq!(guards.balances().collect::<Vec<_>>(), vec![(0, 70), (2, 30)]);
        }

        assert_eq!(store.snapshot().unwrap(), vec![70, 50, 30, 50]);
    }

    #[test]
    fn test_empty_acquisition_holds_nothing() {
        let store = AccountStore::new(2, 10).unwrap();

        let guards = store.lock_ordered(&[]).unwrap();
        assert!(guards.is_empty());
        assert_eq!(guards.sum(), 0);
    }

    #[test]
    fn test_locks_are_released_after_drop() {
        let store = AccountStore::new(2, 10).unwrap();

        drop(store.lock_all().unwrap());

        // Would block forever if a lock leaked.
        assert_eq!(store.lock_pair(0, 1).unwrap().len(), 2);
    }
}
