//! OS-thread simulation strategy
//!
//! Runs every worker and the auditor on its own named `std::thread`, scoped
//! to the run so nothing outlives it.
//!
//! # Lifecycle
//!
//! 1. Spawn the auditor thread (periodic, polls a `ShutdownSignal`)
//! 2. Spawn `thread_count` worker threads
//! 3. Join every worker
//! 4. Request auditor shutdown and join it
//! 5. Run the final audit on the orchestrating thread

use super::{finish_run, worker_engine, worker_name, SimulationStrategy};
use crate::core::{AccountStore, Auditor, ShutdownSignal};
use crate::types::{
    AuditSummary, SimulationConfig, SimulationError, SimulationReport, WorkerStats,
};
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Instant;

/// Strategy running workers and the auditor on plain OS threads
#[derive(Debug, Clone, Copy)]
pub struct ThreadedStrategy;

type WorkerHandle<'scope> = ScopedJoinHandle<'scope, Result<WorkerStats, SimulationError>>;

impl SimulationStrategy for ThreadedStrategy {
    fn run(
        &self,
        config: &SimulationConfig,
        store: Arc<AccountStore>,
    ) -> Result<SimulationReport, SimulationError> {
        config.validate()?;

        let started = Instant::now();
        let shutdown = ShutdownSignal::new();
        let auditor = Auditor::new(Arc::clone(&store), config.check_interval);

        let (workers, audits) =
            thread::scope(|scope| -> Result<(WorkerStats, AuditSummary), SimulationError> {
                let auditor_handle = thread::Builder::new()
                    .name("auditor".to_string())
                    .spawn_scoped(scope, || auditor.run_periodic(&shutdown))?;

                // Workers that did spawn run to completion even if a later
                // spawn fails; the scope joins them.
                let workers = spawn_workers(scope, config, &store).and_then(join_workers);

                shutdown.request_shutdown();
                let audits = auditor_handle
                    .join()
                    .map_err(|_| SimulationError::thread_panicked("auditor"))
                    .and_then(|result| result);

                Ok((workers?, audits?))
            })?;

        finish_run(config, &store, workers, audits, started.elapsed())
    }
}

fn spawn_workers<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    config: &SimulationConfig,
    store: &Arc<AccountStore>,
) -> Result<Vec<(usize, WorkerHandle<'scope>)>, SimulationError> {
    let mut handles = Vec::with_capacity(config.thread_count);

    for worker_id in 0..config.thread_count {
        let mut engine = worker_engine(worker_id, store, config);
        let ops = config.ops_per_thread;
        let handle = thread::Builder::new()
            .name(worker_name(worker_id))
            .spawn_scoped(scope, move || engine.run(ops))?;
        handles.push((worker_id, handle));
    }

    Ok(handles)
}

fn join_workers(handles: Vec<(usize, WorkerHandle<'_>)>) -> Result<WorkerStats, SimulationError> {
    let mut total = WorkerStats::default();
    let mut first_error = None;

    // Join every handle before reporting, so no worker is left unjoined.
    for (worker_id, handle) in handles {
        let result = handle
            .join()
            .map_err(|_| SimulationError::thread_panicked(&worker_name(worker_id)))
            .and_then(|result| result);
        match result {
            Ok(stats) => total.merge(&stats),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_threaded_strategy_conserves_total() {
        let config = SimulationConfig::new(4, 100, 2, 1_000, Duration::from_millis(50))
            .unwrap()
            .with_seed(3);
        let store = Arc::new(AccountStore::from_config(&config).unwrap());

        let report = ThreadedStrategy.run(&config, store).unwrap();

        assert_eq!(report.final_audit.total, 400);
        assert!(report.is_conserved());
        assert_eq!(report.workers.operations(), 2_000);
        assert_eq!(report.final_balances.len(), 4);
    }

    #[test]
    fn test_threaded_strategy_with_zero_ops() {
        let config = SimulationConfig::new(3, 5, 4, 0, Duration::from_millis(10)).unwrap();
        let store = Arc::new(AccountStore::from_config(&config).unwrap());

        let report = ThreadedStrategy.run(&config, store).unwrap();

        assert_eq!(report.workers, WorkerStats::default());
        assert_eq!(report.final_balances, vec![5, 5, 5]);
    }

    #[test]
    fn test_threaded_strategy_reports_poisoned_lock() {
        let config = SimulationConfig::new(2, 10, 2, 100, Duration::from_millis(10)).unwrap();
        let store = Arc::new(AccountStore::from_config(&config).unwrap());

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guards = poisoner.lock_all().unwrap();
            panic!("poison every account");
        })
        .join();

        let result = ThreadedStrategy.run(&config, store);

        assert!(matches!(
            result,
            Err(SimulationError::LockPoisoned { .. })
        ));
    }
}
