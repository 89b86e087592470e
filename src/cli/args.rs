use crate::types::{Balance, SimulationConfig, SimulationError};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Simulate concurrent transfers between bank accounts while auditing the total
#[derive(Parser, Debug)]
#[command(name = "bank-ledger-simulator")]
#[command(
    about = "Simulate concurrent transfers between bank accounts while auditing the total",
    long_about = None
)]
pub struct CliArgs {
    /// Number of accounts in the ledger
    #[arg(long = "accounts", value_name = "COUNT", default_value_t = 100)]
    pub accounts: usize,

    /// Starting balance of every account
    #[arg(long = "initial-balance", value_name = "AMOUNT", default_value_t = 1000)]
    pub initial_balance: Balance,

    /// Number of concurrent transfer workers
    #[arg(
        long = "threads",
        value_name = "COUNT",
        help = "Number of concurrent transfer workers (default: CPU cores)"
    )]
    pub threads: Option<usize>,

    /// Transfers each worker performs
    #[arg(long = "ops-per-thread", value_name = "COUNT", default_value_t = 100_000)]
    pub ops_per_thread: u64,

    /// Auditor polling period in milliseconds
    #[arg(long = "check-interval-ms", value_name = "MS", default_value_t = 500)]
    pub check_interval_ms: u64,

    /// Orchestration strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "threads",
        help = "Orchestration: 'threads' for OS threads or 'async' for a tokio runtime"
    )]
    pub strategy: StrategyType,

    /// Base seed for reproducible transfer sequences
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Print final balances as CSV to stdout
    #[arg(long = "emit-balances")]
    pub emit_balances: bool,

    /// Log filter, overridden by RUST_LOG
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long = "log-json")]
    pub log_json: bool,
}

/// Available orchestration strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Threads,
    Async,
}

impl CliArgs {
    /// Build a validated SimulationConfig from the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first out-of-range value.
    pub fn to_config(&self) -> Result<SimulationConfig, SimulationError> {
        let mut config = SimulationConfig::new(
            self.accounts,
            self.initial_balance,
            self.threads.unwrap_or_else(num_cpus::get),
            self.ops_per_thread,
            Duration::from_millis(self.check_interval_ms),
        )?;
        config.seed = self.seed;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program"], StrategyType::Threads)]
    #[case::explicit_threads(&["program", "--strategy", "threads"], StrategyType::Threads)]
    #[case::explicit_async(&["program", "--strategy", "async"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[test]
    fn test_defaults() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        let config = parsed.to_config().unwrap();

        assert_eq!(config.account_count, 100);
        assert_eq!(config.initial_balance, 1000);
        assert_eq!(config.thread_count, num_cpus::get());
        assert_eq!(config.ops_per_thread, 100_000);
        assert_eq!(config.check_interval, Duration::from_millis(500));
        assert_eq!(config.seed, None);
        assert!(!parsed.emit_balances);
        assert!(!parsed.log_json);
        assert_eq!(parsed.log_level, "info");
    }

    #[test]
    fn test_all_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--accounts",
            "4",
            "--initial-balance",
            "100",
            "--threads",
            "2",
            "--ops-per-thread",
            "1000",
            "--check-interval-ms",
            "50",
            "--seed",
            "42",
            "--emit-balances",
            "--log-level",
            "debug",
            "--log-json",
        ])
        .unwrap();
        let config = parsed.to_config().unwrap();

        assert_eq!(
            config,
            SimulationConfig::new(4, 100, 2, 1000, Duration::from_millis(50))
                .unwrap()
                .with_seed(42)
        );
        assert!(parsed.emit_balances);
        assert!(parsed.log_json);
        assert_eq!(parsed.log_level, "debug");
    }

    #[rstest]
    #[case::zero_accounts(&["program", "--accounts", "0"], "accounts")]
    #[case::negative_balance(&["program", "--initial-balance=-5"], "initial_balance")]
    #[case::zero_threads(&["program", "--threads", "0"], "threads")]
    #[case::zero_interval(&["program", "--check-interval-ms", "0"], "check_interval_ms")]
    fn test_invalid_values_fail_fast(#[case] args: &[&str], #[case] field: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();

        match parsed.to_config() {
            Err(SimulationError::InvalidConfig { field: actual, .. }) => assert_eq!(actual, field),
            other => panic!("Expected InvalidConfig for {}, got {:?}", field, other),
        }
    }

    #[rstest]
    #[case::invalid_strategy(&["program", "--strategy", "invalid"])]
    #[case::non_numeric_accounts(&["program", "--accounts", "many"])]
    #[case::negative_threads(&["program", "--threads=-1"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
