//! Core simulation module
//!
//! This module contains the components that share the account store:
//! - `traits` - Lock observation hook
//! - `account_store` - Accounts, their locks and the ordered acquisition helper
//! - `transfer_engine` - Per-worker randomized transfers
//! - `auditor` - Full-lock audit pass and the periodic auditor loop

pub mod account_store;
pub mod auditor;
pub mod traits;
pub mod transfer_engine;

pub use account_store::{AccountStore, OrderedGuards};
pub use auditor::{audit, Auditor, ShutdownSignal};
pub use traits::LockObserver;
pub use transfer_engine::TransferEngine;
