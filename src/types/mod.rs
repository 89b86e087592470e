//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The account cell and its id/balance aliases
//! - `transfer`: Transfer outcomes and worker counters
//! - `audit`: Audit snapshots and auditor counters
//! - `config`: Validated simulation configuration
//! - `report`: Final report of a simulation run
//! - `error`: Error types for the simulator

pub mod account;
pub mod audit;
pub mod config;
pub mod error;
pub mod report;
pub mod transfer;

pub use account::{Account, AccountId, Balance};
pub use audit::{AuditSnapshot, AuditSummary};
pub use config::SimulationConfig;
pub use error::SimulationError;
pub use report::SimulationReport;
pub use transfer::{Transfer, TransferOutcome, WorkerStats};
