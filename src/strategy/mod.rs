//! Simulation strategy module
//!
//! This module defines the Strategy pattern for orchestrating a simulation
//! run: starting the auditor, running the workers to completion, stopping the
//! auditor and performing the final audit. Two orchestrations can be selected
//! at runtime:
//!
//! - **threads**: plain OS threads, auditor polling a shutdown flag
//! - **async**: a tokio runtime, workers on the blocking pool, auditor as a
//!   task woken by an interval or a shutdown channel
//!
//! Both produce the same observable behaviour.

use crate::cli::StrategyType;
use crate::core::{audit, auditor, AccountStore, TransferEngine};
use crate::types::{
    AuditSummary, SimulationConfig, SimulationError, SimulationReport, WorkerStats,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod r#async;
pub mod threads;

pub use self::r#async::AsyncStrategy;
pub use threads::ThreadedStrategy;

/// Orchestration strategy for one simulation run
pub trait SimulationStrategy: Send + Sync {
    /// Run the workers and the auditor over `store` until every worker has
    /// performed `config.ops_per_thread` operations
    ///
    /// The store is used as given; its size and initial total take
    /// precedence over the account settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid, a thread cannot be spawned or
    /// panics, or an account lock is poisoned. A broken invariant is not an
    /// error here; it is reported in the returned `SimulationReport`.
    fn run(
        &self,
        config: &SimulationConfig,
        store: Arc<AccountStore>,
    ) -> Result<SimulationReport, SimulationError>;
}

/// Create a simulation strategy based on the specified strategy type
pub fn create_strategy(strategy_type: StrategyType) -> Box<dyn SimulationStrategy> {
    match strategy_type {
        StrategyType::Threads => Box::new(ThreadedStrategy),
        StrategyType::Async => Box::new(AsyncStrategy),
    }
}

/// Build a store from `config` and run it with the selected strategy
pub fn run_simulation(
    config: &SimulationConfig,
    strategy_type: StrategyType,
) -> Result<SimulationReport, SimulationError> {
    config.validate()?;
    let store = Arc::new(AccountStore::from_config(config)?);

    info!(
        accounts = store.account_count(),
        initial_total = store.initial_total(),
        threads = config.thread_count,
        ops_per_thread = config.ops_per_thread,
        check_interval_ms = config.check_interval.as_millis() as u64,
        strategy = ?strategy_type,
        "Starting simulation"
    );

    create_strategy(strategy_type).run(config, store)
}

/// Create the transfer engine for one worker
fn worker_engine(
    worker_id: usize,
    store: &Arc<AccountStore>,
    config: &SimulationConfig,
) -> TransferEngine {
    match config.seed {
        Some(seed) => TransferEngine::with_seed(worker_id, Arc::clone(store), seed),
        None => TransferEngine::new(worker_id, Arc::clone(store)),
    }
}

/// Thread or task name for a worker
fn worker_name(worker_id: usize) -> String {
    format!("worker-{}", worker_id)
}

/// Final audit and report, once every worker and the auditor have stopped
fn finish_run(
    config: &SimulationConfig,
    store: &AccountStore,
    workers: WorkerStats,
    audits: AuditSummary,
    elapsed: Duration,
) -> Result<SimulationReport, SimulationError> {
    let final_audit = audit(store)?;
    auditor::report("final", &final_audit);
    let final_balances = store.snapshot()?;

    let report = SimulationReport {
        final_audit,
        audits,
        workers,
        final_balances,
        elapsed,
        thread_count: config.thread_count,
        ops_per_thread: config.ops_per_thread,
    };

    info!(
        total = report.final_audit.total,
        expected = report.final_audit.expected,
        verdict = report.final_audit.verdict(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        throughput = report.throughput(),
        completed = report.workers.completed,
        skipped = report.workers.skipped,
        audit_passes = report.audits.passes,
        broken_passes = report.audits.broken,
        "Simulation finished"
    );

    Ok(report)
}
