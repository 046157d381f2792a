/// Account identity, balance and the events that change it.
/// State is modified using events, which are created by handling commands
pub mod account;

/// Deposit and withdrawal commands that later are executed by [`account`].
/// Amounts are validated here, before any account is looked up.
pub mod command;

/// Account ledger interface, plus "in memory" implementation and the ledger
/// text report.
pub mod ledger;

/// Drives the ledger from a CSV operation script. It is used by the binary
/// and by the integration tests, so it lives here.
pub mod bin_utils;
