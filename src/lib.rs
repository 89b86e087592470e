//! Bank Ledger Simulator Library
//! # Overview
//!
//! This library simulates a fixed set of in-memory bank accounts mutated by
//! many worker threads performing random pairwise transfers, while a
//! background auditor repeatedly verifies that the total balance never changes.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, AuditSnapshot, SimulationConfig, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Simulation components:
//!   - [`core::account_store`] - Accounts, their locks and the ordered acquisition helper
//!   - [`core::transfer_engine`] - Per-worker randomized transfers
//!   - [`core::auditor`] - Full-lock audits and the periodic auditor
//! - [`strategy`] - Run orchestration on OS threads or a tokio runtime
//! - [`io`] - CSV output of final balances
//! - [`logging`] - Tracing subscriber setup
//!
//! # Locking Protocol
//!
//! Every account has its own lock. Any code path that holds more than one
//! lock acquires them in ascending account id order, through a single helper
//! shared by the workers (two locks) and the auditor (all locks). This total
//! order makes the system deadlock-free.
//!
//! # Conservation Invariant
//!
//! With every lock held, the sum of all balances equals
//! `account_count * initial_balance`. Transfers move value between two locked
//! accounts and never create or destroy it.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{
    audit, AccountStore, Auditor, LockObserver, ShutdownSignal, TransferEngine,
};
pub use crate::io::write_balances_csv;
pub use strategy::{create_strategy, run_simulation, SimulationStrategy};
pub use types::{
    Account, AccountId, AuditSnapshot, AuditSummary, Balance, SimulationConfig, SimulationError,
    SimulationReport, Transfer, TransferOutcome, WorkerStats,
};
