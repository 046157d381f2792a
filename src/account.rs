use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::command::{TransactionAction, TransactionCommand};

pub type CardNumber = u32;
pub type Pin = u32;

/// Identity of an account. Both the card number and the PIN take part in
/// equality, so the same card with a different PIN is a different account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountKey {
    pub card_number: CardNumber,
    pub pin: Pin,
}

impl AccountKey {
    pub fn new(card_number: CardNumber, pin: Pin) -> Self {
        Self { card_number, pin }
    }
}

impl From<(CardNumber, Pin)> for AccountKey {
    fn from((card_number, pin): (CardNumber, Pin)) -> Self {
        Self::new(card_number, pin)
    }
}

// PIN is left out on purpose, this ends up in error messages and logs.
impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card number {}", self.card_number)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> &AccountEventKind {
        &self.kind
    }

    /// Transaction log line for this event, given the balance after it was applied.
    pub fn describe(&self, updated_balance: Decimal) -> String {
        let label = match self.kind {
            AccountEventKind::Deposited => "Deposit",
            AccountEventKind::Withdrawn => "Withdrawal",
        };
        format!(
            "{label} - Amount: {}, Updated Balance: {}",
            format_currency(self.amount),
            format_currency(updated_balance)
        )
    }
}

/// Rounds half away from zero to cents and always renders two fractional digits,
/// so `40.5` becomes `40.50`. `rescale` can't be used here, it gives up on large values.
pub fn format_cents(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Renders `amount` as dollars with exactly two fractional digits, e.g. `$40.50`.
pub fn format_currency(amount: Decimal) -> String {
    format!("${}", format_cents(amount))
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Depositing {amount} would overflow the balance")]
    BalanceOverflow { amount: Decimal },
}

#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    balance: Decimal,
}

impl Account {
    pub fn new(name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
            }
        }
    }

    pub fn handle_transaction(
        &self,
        command: &TransactionCommand,
    ) -> Result<AccountEvent, AccountError> {
        match command.action {
            TransactionAction::Deposit => {
                if self.balance.checked_add(command.amount).is_none() {
                    return Err(AccountError::BalanceOverflow {
                        amount: command.amount,
                    });
                }
                Ok(AccountEvent {
                    amount: command.amount,
                    kind: AccountEventKind::Deposited,
                })
            }
            TransactionAction::Withdraw => {
                if self.balance >= command.amount {
                    Ok(AccountEvent {
                        amount: command.amount,
                        kind: AccountEventKind::Withdrawn,
                    })
                } else {
                    Err(AccountError::InsufficientFunds {
                        requested: command.amount,
                        available: self.balance,
                    })
                }
            }
        }
    }
}
