//! Bank Ledger Simulator CLI
//!
//! Runs one simulation and reports whether the total balance was conserved.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts 4 --initial-balance 100 --threads 2 --ops-per-thread 1000
//! cargo run -- --strategy async --check-interval-ms 50
//! cargo run -- --seed 42 --emit-balances > balances.csv
//! ```
//!
//! Logs (one line per audit pass plus the final report) go to stderr. The
//! final report is also printed to stdout, unless `--emit-balances` replaces
//! it with the balances CSV.
//!
//! # Exit Codes
//!
//! - 0: Every audit held
//! - 1: Error (invalid configuration, thread failure, output failure)
//! - 2: The conservation invariant was broken

use bank_ledger_simulator::{cli, io, logging, strategy};
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    logging::init_logging(&args.log_level, args.log_json);

    // Invalid configuration fails before any thread is spawned
    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let report = match strategy::run_simulation(&config, args.strategy.clone()) {
        Ok(report) => report,
        Err(e) => {
            error!("Simulation failed: {}", e);
            process::exit(1);
        }
    };

    if args.emit_balances {
        let mut output = std::io::stdout();
        if let Err(e) = io::write_balances_csv(&report.final_balances, &mut output) {
            error!("Failed to write balances: {}", e);
            process::exit(1);
        }
    } else {
        println!("{}", report);
    }

    if let Err(e) = report.ensure_conserved() {
        error!(broken_passes = report.audits.broken, "{}", e);
        process::exit(2);
    }
}
