use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::account::AccountKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone)]
pub struct TransactionCommand {
    pub key: AccountKey,
    pub action: TransactionAction,
    pub amount: Decimal,
}

#[derive(Debug, Error)]
pub enum AccountCommandError {
    #[error("Amount must be positive for {action:?}, got {amount}")]
    NonPositiveAmount {
        action: TransactionAction,
        amount: Decimal,
    },
}

impl TransactionCommand {
    /// Validates the amount before anything else is looked at, so a bad amount
    /// is reported even for a key that has no account.
    pub fn parse_command(
        key: AccountKey,
        action: TransactionAction,
        amount: Decimal,
    ) -> Result<Self, AccountCommandError> {
        if amount > Decimal::zero() {
            Ok(Self {
                key,
                action,
                amount,
            })
        } else {
            Err(AccountCommandError::NonPositiveAmount { action, amount })
        }
    }
}
