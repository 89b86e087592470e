//! Final simulation report
//!
//! Collected by a strategy after every worker and the auditor have stopped.

use super::account::Balance;
use super::audit::{AuditSnapshot, AuditSummary};
use super::error::SimulationError;
use super::transfer::WorkerStats;
use std::fmt;
use std::time::Duration;

/// Outcome of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Audit performed after all threads stopped
    pub final_audit: AuditSnapshot,
    /// Counters from the periodic auditor
    pub audits: AuditSummary,
    /// Transfer counters summed over all workers
    pub workers: WorkerStats,
    /// Balances read under the final full-lock snapshot, indexed by account id
    pub final_balances: Vec<Balance>,
    /// Wall time from the first spawn to the final audit
    pub elapsed: Duration,
    /// Number of workers that ran
    pub thread_count: usize,
    /// Operations each worker performed
    pub ops_per_thread: u64,
}

impl SimulationReport {
    /// Operations performed by all workers
    pub fn total_ops(&self) -> u64 {
        self.thread_count as u64 * self.ops_per_thread
    }

    /// Operations per second over the elapsed wall time
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_ops() as f64 / secs
        } else {
            0.0
        }
    }

    /// Whether the final audit and every periodic audit held
    pub fn is_conserved(&self) -> bool {
        self.final_audit.is_conserved() && self.audits.broken == 0
    }

    /// Turn a broken invariant into an error
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` carrying the final audit's totals if any
    /// audit of the run was broken.
    pub fn ensure_conserved(&self) -> Result<(), SimulationError> {
        if self.is_conserved() {
            Ok(())
        } else {
            Err(SimulationError::InvariantViolation {
                total: self.final_audit.total,
                expected: self.final_audit.expected,
            })
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elapsed={}ms ops={} throughput={:.0} ops/s",
            self.final_audit,
            self.elapsed.as_millis(),
            self.total_ops(),
            self.throughput()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: Balance, broken: u64, elapsed: Duration) -> SimulationReport {
        SimulationReport {
            final_audit: AuditSnapshot {
                total,
                expected: 400,
            },
            audits: AuditSummary { passes: 3, broken },
            workers: WorkerStats::default(),
            final_balances: vec![100; 4],
            elapsed,
            thread_count: 2,
            ops_per_thread: 1000,
        }
    }

    #[test]
    fn test_throughput() {
        let report = report(400, 0, Duration::from_millis(500));

        assert_eq!(report.total_ops(), 2000);
        assert!((report.throughput() - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn test_throughput_with_zero_elapsed() {
        assert_eq!(report(400, 0, Duration::ZERO).throughput(), 0.0);
    }

    #[test]
    fn test_conserved_report() {
        let report = report(400, 0, Duration::from_millis(10));

        assert!(report.is_conserved());
        assert!(report.ensure_conserved().is_ok());
    }

    #[test]
    fn test_broken_final_audit_is_an_error() {
        let report = report(390, 0, Duration::from_millis(10));

        assert_eq!(
            report.ensure_conserved().unwrap_err(),
            SimulationError::InvariantViolation {
                total: 390,
                expected: 400
            }
        );
    }

    #[test]
    fn test_broken_periodic_audit_is_an_error() {
        let report = report(400, 1, Duration::from_millis(10));

        assert!(!report.is_conserved());
        assert!(report.ensure_conserved().is_err());
    }

    #[test]
    fn test_display() {
        let report = report(400, 0, Duration::from_millis(500));

        assert_eq!(
            report.to_string(),
            "total=400 expected=400 verdict=OK elapsed=500ms ops=2000 throughput=4000 ops/s"
        );
    }
}
