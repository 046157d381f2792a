use std::{
    collections::{HashMap, hash_map::Entry},
    io::Write,
};

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    account::{Account, AccountKey, CardNumber, Pin},
    command::{TransactionAction, TransactionCommand},
};

use super::{AccountLedger, LedgerError, report};

pub type TransactionLog = Vec<String>;

/// Accounts and their transaction logs, kept in two maps with the same key set.
/// Registration is the only place that adds keys and it adds to both.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: HashMap<AccountKey, Account>,
    transactions: HashMap<AccountKey, TransactionLog>,
}

impl InMemoryLedger {
    pub fn accounts(&self) -> &HashMap<AccountKey, Account> {
        &self.accounts
    }

    pub fn transactions(&self) -> &HashMap<AccountKey, TransactionLog> {
        &self.transactions
    }

    fn account(&self, key: AccountKey) -> Result<&Account, LedgerError> {
        self.accounts
            .get(&key)
            .ok_or(LedgerError::AccountNotFound { key })
    }

    fn process_transaction(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        amount: Decimal,
        action: TransactionAction,
    ) -> Result<(), LedgerError> {
        let key = AccountKey::new(card_number, pin);
        let result = TransactionCommand::parse_command(key, action, amount)
            .map_err(LedgerError::from)
            .and_then(|command| self.commit(command));
        if let Err(err) = &result {
            debug!(%key, ?action, %amount, %err, "transaction rejected");
        }
        result
    }

    fn commit(&mut self, command: TransactionCommand) -> Result<(), LedgerError> {
        let key = command.key;
        let Some(acc) = self.accounts.get_mut(&key) else {
            return Err(LedgerError::AccountNotFound { key });
        };
        let evt = acc.handle_transaction(&command)?;
        acc.apply(&evt);
        let balance = acc.balance();
        self.transactions
            .entry(key)
            .or_default()
            .push(evt.describe(balance));
        debug!(%key, kind = ?evt.kind(), amount = %evt.amount(), %balance, "transaction committed");
        Ok(())
    }
}

impl AccountLedger for InMemoryLedger {
    fn register_account(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError> {
        let key = AccountKey::new(card_number, pin);
        let Entry::Vacant(entry) = self.accounts.entry(key) else {
            debug!(%key, "duplicate registration rejected");
            return Err(LedgerError::DuplicateAccount { key });
        };
        entry.insert(Account::new(name, initial_balance));
        self.transactions.insert(key, TransactionLog::new());
        debug!(%key, %initial_balance, "account registered");
        Ok(())
    }

    fn check_balance(&self, card_number: CardNumber, pin: Pin) -> Result<Decimal, LedgerError> {
        self.account(AccountKey::new(card_number, pin))
            .map(Account::balance)
    }

    fn withdraw_cash(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        self.process_transaction(card_number, pin, amount, TransactionAction::Withdraw)
    }

    fn deposit_cash(
        &mut self,
        card_number: CardNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        self.process_transaction(card_number, pin, amount, TransactionAction::Deposit)
    }

    fn contains_account(&self, key: AccountKey) -> bool {
        self.accounts.contains_key(&key)
    }

    fn print_ledger<W: Write>(
        &self,
        output: &mut W,
        card_number: CardNumber,
        pin: Pin,
    ) -> Result<(), LedgerError> {
        let key = AccountKey::new(card_number, pin);
        let account = self.account(key)?;
        let entries = self
            .transactions
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        report::write_ledger(output, key, account, entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::{FromPrimitive, Zero};

    use crate::{account::AccountError, command::AccountCommandError, ledger::ErrorKind};

    use super::*;

    #[test]
    fn process_some_transactions() {
        let mut ledger = InMemoryLedger::default();
        ledger
            .register_account(1, 11, "One", Decimal::zero())
            .unwrap();
        ledger
            .register_account(2, 22, "Two", Decimal::from_u32(5).unwrap())
            .unwrap();
        assert_eq!(ledger.accounts.len(), 2);
        assert_eq!(ledger.transactions.len(), 2);

        ledger
            .deposit_cash(1, 11, Decimal::from_u32(10).unwrap())
            .unwrap();
        ledger
            .withdraw_cash(2, 22, Decimal::from_u32(5).unwrap())
            .unwrap();
        assert_eq!(
            ledger.check_balance(1, 11).unwrap(),
            Decimal::from_u32(10).unwrap()
        );
        assert_eq!(ledger.check_balance(2, 22).unwrap(), Decimal::zero());
        assert_eq!(
            ledger.transactions[&AccountKey::new(1, 11)],
            vec!["Deposit - Amount: $10.00, Updated Balance: $10.00"]
        );
        assert_eq!(
            ledger.transactions[&AccountKey::new(2, 22)],
            vec!["Withdrawal - Amount: $5.00, Updated Balance: $0.00"]
        );

        let err = ledger
            .withdraw_cash(2, 22, Decimal::from_u32(1).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AccountErr(AccountError::InsufficientFunds { .. })
        ));
        assert_eq!(ledger.transactions[&AccountKey::new(2, 22)].len(), 1);
    }

    #[test]
    fn amount_is_checked_before_account_lookup() {
        let mut ledger = InMemoryLedger::default();
        let err = ledger
            .deposit_cash(9, 9, Decimal::from_i32(-1).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::CommandErr(AccountCommandError::NonPositiveAmount {
                action: TransactionAction::Deposit,
                ..
            })
        ));

        let err = ledger
            .withdraw_cash(9, 9, Decimal::from_u32(1).unwrap())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn collections_stay_in_lock_step() {
        let mut ledger = InMemoryLedger::default();
        ledger
            .register_account(3, 33, "Three", Decimal::zero())
            .unwrap();
        ledger
            .register_account(3, 34, "Three again", Decimal::zero())
            .unwrap();
        assert!(
            ledger
                .register_account(3, 33, "Dup", Decimal::from_u32(1).unwrap())
                .is_err()
        );
        let _ = ledger.deposit_cash(4, 44, Decimal::from_u32(1).unwrap());
        let _ = ledger.withdraw_cash(4, 44, Decimal::from_u32(1).unwrap());

        assert_eq!(ledger.accounts.len(), ledger.transactions.len());
        for key in ledger.accounts.keys() {
            assert!(ledger.transactions.contains_key(key));
        }
        assert!(!ledger.contains_account(AccountKey::new(4, 44)));
        assert_eq!(ledger.accounts[&AccountKey::new(3, 33)].name(), "Three");
    }

    #[test]
    fn print_ledger_to_writer() {
        let mut ledger = InMemoryLedger::default();
        ledger
            .register_account(5, 55, "Eve", Decimal::from_u32(10).unwrap())
            .unwrap();
        ledger.deposit_cash(5, 55, Decimal::new(12345, 2)).unwrap();

        let mut output = Vec::new();
        ledger.print_ledger(&mut output, 5, 55).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Name: Eve\nCard Number: 5\nPIN: 55\n----------------------------\n\
             Deposit - Amount: $123.45, Updated Balance: $133.45\n"
        );

        let mut output = Vec::new();
        let err = ledger.print_ledger(&mut output, 5, 56).unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
        assert!(output.is_empty());
    }

    #[test]
    fn log_formats_balances_near_the_decimal_limit() {
        let mut ledger = InMemoryLedger::default();
        ledger.register_account(1, 1, "Big", Decimal::MAX).unwrap();
        ledger
            .withdraw_cash(1, 1, Decimal::from_u32(1).unwrap())
            .unwrap();
        assert_eq!(
            ledger.transactions[&AccountKey::new(1, 1)],
            vec!["Withdrawal - Amount: $1.00, Updated Balance: $79228162514264337593543950334.00"]
        );
    }
}
