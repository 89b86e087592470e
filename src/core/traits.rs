//! Core traits
//!
//! Hooks that let callers watch the store's locking protocol without being
//! able to change it.

use crate::types::AccountId;

/// Observer notified around every account lock operation
///
/// Installed on an `AccountStore` with `with_observer`. Calls are made from
/// whichever thread performs the acquisition or release, so implementations
/// must be thread-safe and should be cheap: `before_acquire` runs on the hot
/// path of every transfer and audit.
pub trait LockObserver: Send + Sync {
    /// Called immediately before the calling thread blocks on `account`'s lock
    fn before_acquire(&self, account: AccountId);

    /// Called immediately after the calling thread released `account`'s lock
    fn after_release(&self, account: AccountId);
}
