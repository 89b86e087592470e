//! CSV format handling for account balance output
//!
//! Writes the balances read under the final full-lock snapshot, one row per
//! account, with columns: account, balance.

use crate::types::{AccountId, Balance, SimulationError};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;

/// One row of the balances CSV
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRow {
    pub account: AccountId,
    pub balance: Balance,
}

/// Write account balances to CSV format
///
/// `balances` is indexed by account id, so rows come out in ascending id
/// order. The header is written even when there are no rows.
///
/// # Errors
///
/// Returns `SimulationError::Csv` or `SimulationError::Io` if writing fails.
pub fn write_balances_csv(
    balances: &[Balance],
    output: &mut dyn Write,
) -> Result<(), SimulationError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);

    writer.write_record(["account", "balance"])?;
    for (account, &balance) in balances.iter().enumerate() {
        writer.serialize(BalanceRow { account, balance })?;
    }
    writer.flush()?;

    Ok(())
}
