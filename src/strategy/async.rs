//! Asynchronous simulation strategy
//!
//! This module runs the simulation on a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncStrategy
//!     ├── tokio runtime
//!     │   ├── blocking pool: one TransferEngine per worker
//!     │   └── auditor task: interval tick -> audit on the blocking pool
//!     └── watch channel (shutdown, wakes the auditor immediately)
//! ```
//!
//! Account locks are blocking `std::sync::Mutex`es, so every piece of code
//! that takes them runs on the blocking pool, never on a runtime worker.
//! Observable behaviour matches `ThreadedStrategy`; only the auditor's wakeup
//! mechanism differs (event-driven instead of polling).

use super::{finish_run, worker_engine, worker_name, SimulationStrategy};
use crate::core::{audit, auditor, AccountStore};
use crate::types::{
    AuditSummary, SimulationConfig, SimulationError, SimulationReport, WorkerStats,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinError;
use tokio::time::{self, MissedTickBehavior};

/// Strategy running workers on tokio's blocking pool and the auditor as a task
#[derive(Debug, Clone, Copy)]
pub struct AsyncStrategy;

impl SimulationStrategy for AsyncStrategy {
    fn run(
        &self,
        config: &SimulationConfig,
        store: Arc<AccountStore>,
    ) -> Result<SimulationReport, SimulationError> {
        config.validate()?;

        // Room for every worker plus one audit pass at a time.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .max_blocking_threads(config.thread_count + 1)
            .enable_time()
            .build()
            .map_err(|e| SimulationError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let started = std::time::Instant::now();
        let (workers, audits) = runtime.block_on(async {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let auditor = tokio::spawn(periodic_audits(
                Arc::clone(&store),
                config.check_interval,
                shutdown_rx,
            ));

            let handles = (0..config.thread_count).map(|worker_id| {
                let mut engine = worker_engine(worker_id, &store, config);
                let ops = config.ops_per_thread;
                tokio::task::spawn_blocking(move || engine.run(ops))
            });
            let results = futures::future::join_all(handles).await;

            // The receiver may already be gone if the auditor failed.
            let _ = shutdown_tx.send(true);
            let audits = auditor
                .await
                .map_err(|e| task_failed("auditor", e))
                .and_then(|result| result);

            let mut total = WorkerStats::default();
            for (worker_id, result) in results.into_iter().enumerate() {
                let stats = result
                    .map_err(|e| task_failed(&worker_name(worker_id), e))
                    .and_then(|result| result)?;
                total.merge(&stats);
            }

            Ok::<_, SimulationError>((total, audits?))
        })?;
        let elapsed = started.elapsed();

        finish_run(config, &store, workers, audits, elapsed)
    }
}

/// Audit every `interval` until `shutdown` changes or its sender is dropped
async fn periodic_audits(
    store: Arc<AccountStore>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<AuditSummary, SimulationError> {
    let mut summary = AuditSummary::default();
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                let store = Arc::clone(&store);
                let snapshot = tokio::task::spawn_blocking(move || audit(&store))
                    .await
                    .map_err(|e| task_failed("auditor", e))??;
                summary.record(&snapshot);
                auditor::report("periodic", &snapshot);
            }
        }
    }

    Ok(summary)
}

fn task_failed(name: &str, error: JoinError) -> SimulationError {
    if error.is_panic() {
        SimulationError::thread_panicked(name)
    } else {
        SimulationError::runtime(format!("Task '{}' did not complete: {}", name, error))
    }
}
