//! This module could be a separate crate on its own, to drive [`crate::ledger`] from
//! a script, but for simplicity purposes it lives in the library next to the engine.

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use crate::{
    account::{AccountKey, format_cents},
    ledger::{AccountLedger, ErrorKind, LedgerError, in_memory_ledger::InMemoryLedger},
};
use csv_parser::{CsvOperationParser, Operation, OperationKind};
use csv_printer::{Balance, print_balances};
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error("`{field}` is required for {kind:?}")]
    MissingField {
        kind: OperationKind,
        field: &'static str,
    },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Ledger(err) => err.kind(),
            ServiceError::Parse(_) | ServiceError::MissingField { .. } => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    /// Relative `file` paths of `ledger` rows are resolved against this directory.
    pub ledger_dir: PathBuf,
    pub error_printer: Box<dyn FnMut(u64, ServiceError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(self) -> Result<()> {
        let Self {
            input,
            output,
            ledger_dir,
            mut error_printer,
        } = self;
        let parser = CsvOperationParser::new(input).context("Failed to read CSV header")?;

        let mut ledger = InMemoryLedger::default();
        let mut balances = Vec::new();
        let (mut rows, mut failed) = (0usize, 0usize);

        for (line, row) in parser {
            rows += 1;
            let result = row
                .map_err(ServiceError::from)
                .and_then(|op| execute(&mut ledger, &ledger_dir, op));
            match result {
                Ok(Some(balance)) => balances.push(balance),
                Ok(None) => {}
                Err(err) => {
                    failed += 1;
                    error_printer(line, err);
                }
            }
        }
        info!(rows, failed, accounts = ledger.accounts().len(), "script processed");

        print_balances(output, balances.into_iter())
    }
}

fn required<T>(
    value: Option<T>,
    kind: OperationKind,
    field: &'static str,
) -> Result<T, ServiceError> {
    value.ok_or(ServiceError::MissingField { kind, field })
}

fn execute(
    ledger: &mut InMemoryLedger,
    ledger_dir: &Path,
    op: Operation,
) -> Result<Option<Balance>, ServiceError> {
    let Operation {
        kind,
        card,
        pin,
        name,
        amount,
        file,
    } = op;
    match kind {
        OperationKind::Register => {
            let initial_balance = required(amount, kind, "amount")?;
            ledger.register_account(card, pin, name.unwrap_or_default(), initial_balance)?;
        }
        OperationKind::Deposit => {
            ledger.deposit_cash(card, pin, required(amount, kind, "amount")?)?;
        }
        OperationKind::Withdraw => {
            ledger.withdraw_cash(card, pin, required(amount, kind, "amount")?)?;
        }
        OperationKind::Balance => {
            let key = AccountKey::new(card, pin);
            let account = ledger
                .accounts()
                .get(&key)
                .ok_or(LedgerError::AccountNotFound { key })?;
            return Ok(Some(Balance {
                card,
                name: account.name().to_owned(),
                balance: format_cents(account.balance()),
            }));
        }
        OperationKind::Ledger => {
            let file = required(file, kind, "file")?;
            ledger.print_ledger_to_file(ledger_dir.join(file), card, pin)?;
        }
    }
    Ok(None)
}
