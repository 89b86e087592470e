//! Benchmark suite for comparing orchestration strategies
//!
//! This benchmark compares the OS-thread and tokio strategies on the same
//! ledger sizes using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Workloads
//!
//! - `contended` - 4 accounts, heavy lock contention
//! - `spread` - 1,000 accounts, mostly disjoint pairs

use bank_ledger_simulator::cli::StrategyType;
use bank_ledger_simulator::strategy::run_simulation;
use bank_ledger_simulator::SimulationConfig;
use std::time::Duration;

fn main() {
    divan::main();
}

fn config(accounts: usize) -> SimulationConfig {
    SimulationConfig::new(accounts, 1_000, 4, 10_000, Duration::from_millis(5))
        .expect("Invalid benchmark configuration")
        .with_seed(7)
}

#[divan::bench(args = [StrategyType::Threads, StrategyType::Async])]
fn contended(strategy: &StrategyType) {
    let report = run_simulation(&config(4), strategy.clone()).expect("Simulation failed");
    assert!(report.is_conserved());
}

#[divan::bench(args = [StrategyType::Threads, StrategyType::Async])]
fn spread(strategy: &StrategyType) {
    let report = run_simulation(&config(1_000), strategy.clone()).expect("Simulation failed");
    assert!(report.is_conserved());
}
