use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use atm_ledger::{
    bin_utils::{Service, ServiceError},
    ledger::ErrorKind,
};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Runs an operation script against an in-memory account ledger and prints
/// the requested balances as CSV.
#[derive(Debug, Parser)]
#[command(name = "atm-ledger")]
struct Args {
    /// CSV script with `type,card,pin,name,amount,file` columns
    input: PathBuf,

    /// Directory that relative ledger file paths are resolved against
    #[arg(long, default_value = ".")]
    ledger_dir: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open `{}`", args.input.display()))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        ledger_dir: args.ledger_dir,
        error_printer: Box::new(|line, err: ServiceError| {
            match err.kind() {
                ErrorKind::InvalidArgument | ErrorKind::Io => {
                    eprintln!("Error at line {line}: {err}")
                }
                ErrorKind::InsufficientFunds => {
                    // a declined withdrawal is a normal outcome, not a broken script
                    debug!(line, %err, "withdrawal declined")
                }
            }
        }),
    };
    service.run()
}
