//! Audit result types
//!
//! An audit snapshot is the pair (computed total, conservation verdict)
//! produced by one full-lock pass. It is reported and then dropped.

use super::account::Balance;
use std::fmt;

/// Result of one audit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSnapshot {
    /// Sum of every balance while all locks were held
    pub total: Balance,

    /// The store's initial total
    pub expected: Balance,
}

impl AuditSnapshot {
    /// Whether the conservation invariant held for this pass
    pub fn is_conserved(&self) -> bool {
        self.total == self.expected
    }

    /// Human-readable verdict
    pub fn verdict(&self) -> &'static str {
        if self.is_conserved() {
            "OK"
        } else {
            "BROKEN"
        }
    }
}

impl fmt::Display for AuditSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} expected={} verdict={}",
            self.total,
            self.expected,
            self.verdict()
        )
    }
}

/// Counters kept by the periodic auditor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Audit passes performed
    pub passes: u64,

    /// Passes that reported a broken invariant
    pub broken: u64,
}

impl AuditSummary {
    /// Count one audit pass
    pub fn record(&mut self, snapshot: &AuditSnapshot) {
        self.passes += 1;
        if !snapshot.is_conserved() {
            self.broken += 1;
        }
    }
}
