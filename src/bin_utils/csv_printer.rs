use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::account::CardNumber;

pub const HEADER: [&str; 3] = ["card", "name", "balance"];

#[derive(Debug, Serialize)]
pub struct Balance {
    pub card: CardNumber,
    pub name: String,
    /// Already rendered with two fractional digits.
    pub balance: String,
}

/// Writes the balance report. The header is written even when there are no rows.
pub fn print_balances<W>(
    output: &mut W,
    balances: impl Iterator<Item = Balance>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    if let Err(err) = writer.write_record(HEADER) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    for balance in balances {
        if let Err(err) = writer.serialize(balance) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
