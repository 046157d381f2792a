use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{AccountError, AccountKey, CardNumber, Pin},
    command::AccountCommandError,
};

pub mod in_memory_ledger;
pub mod report;

/// Coarse classification of [`LedgerError`], for callers that only need to
/// know whether to reject the input, ask for a smaller amount, or give up on I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InsufficientFunds,
    Io,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error("Account for {key} already exists")]
    DuplicateAccount { key: AccountKey },
    #[error("No account found for {key}")]
    AccountNotFound { key: AccountKey },
    #[error("Failed to write ledger: {0}")]
    Io(#[from] io::Error),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::AccountErr(AccountError::InsufficientFunds { .. }) => {
                ErrorKind::InsufficientFunds
            }
            LedgerError::Io(_) => ErrorKind::Io,
            LedgerError::CommandErr(_)
            | LedgerError::AccountErr(AccountError::BalanceOverflow { .. })
            | LedgerError::DuplicateAccount { .. }
            | LedgerError::AccountNotFound { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Account ledger engine interface. Every operation either fully succeeds or
/// leaves the ledger exactly as it was.
///
/// NOTE: only the in-memory implementation exists, the trait marks the seam a
/// persistent store would plug into.
pub trait AccountLedger {
    fn register_account(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError>;

    fn check_balance(&self, card_number: CardNumber, pin: Pin) -> Result<Decimal, LedgerError>;

    fn withdraw_cash(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), LedgerError>;

    fn deposit_cash(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), LedgerError>;

    fn contains_account(&self, key: AccountKey) -> bool;

    /// Writes the ledger of an account, see [`report::write_ledger`] for the format.
    fn print_ledger<W: Write>(
        &self,
        output: &mut W,
        card_number: CardNumber,
        pin: Pin,
    ) -> Result<(), LedgerError>;

    /// Writes the ledger into a file at `path`. The file is left untouched
    /// when the account does not exist.
    fn print_ledger_to_file(
        &self,
        path: impl AsRef<Path>,
        card_number: CardNumber,
        pin: Pin,
    ) -> Result<(), LedgerError> {
        let key = AccountKey::new(card_number, pin);
        if !self.contains_account(key) {
            return Err(LedgerError::AccountNotFound { key });
        }
        let mut output = BufWriter::new(File::create(path)?);
        self.print_ledger(&mut output, card_number, pin)?;
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use crate::command::TransactionAction;

    use super::*;

    #[test]
    fn classify_errors() {
        let key = AccountKey::new(1, 1);
        let invalid = [
            LedgerError::DuplicateAccount { key },
            LedgerError::AccountNotFound { key },
            LedgerError::CommandErr(AccountCommandError::NonPositiveAmount {
                action: TransactionAction::Deposit,
                amount: Decimal::from_i32(-1).unwrap(),
            }),
            LedgerError::AccountErr(AccountError::BalanceOverflow {
                amount: Decimal::MAX,
            }),
        ];
        for err in invalid {
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err}");
        }

        let err = LedgerError::from(AccountError::InsufficientFunds {
            requested: Decimal::from_u32(2).unwrap(),
            available: Decimal::from_u32(1).unwrap(),
        });
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let err = LedgerError::from(io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.to_string(), "Failed to write ledger: disk full");
    }

    #[test]
    fn error_messages_do_not_contain_pin() {
        let err = LedgerError::AccountNotFound {
            key: AccountKey::new(11111111, 2222),
        };
        assert_eq!(err.to_string(), "No account found for card number 11111111");
    }
}
