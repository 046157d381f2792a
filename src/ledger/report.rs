use std::io::{self, Write};

use crate::account::{Account, AccountKey};

pub const SEPARATOR: &str = "----------------------------";

/// Ledger text format:
///
/// ```text
/// Name: <holder name>
/// Card Number: <card number>
/// PIN: <pin>
/// ----------------------------
/// <one line per transaction, oldest first>
/// ```
pub fn write_ledger<W>(
    output: &mut W,
    key: AccountKey,
    account: &Account,
    entries: &[String],
) -> io::Result<()>
where
    W: Write,
{
    writeln!(output, "Name: {}", account.name())?;
    writeln!(output, "Card Number: {}", key.card_number)?;
    writeln!(output, "PIN: {}", key.pin)?;
    writeln!(output, "{SEPARATOR}")?;
    for entry in entries {
        writeln!(output, "{entry}")?;
    }
    Ok(())
}
