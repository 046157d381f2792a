use std::{io::Read, path::PathBuf};

use csv::{Position, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

use crate::account::{CardNumber, Pin};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Register,
    Deposit,
    Withdraw,
    Balance,
    Ledger,
}

/// One row of an operation script. Columns a row type doesn't use may be left empty.
#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub card: CardNumber,
    pub pin: Pin,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "exact_decimal")]
    pub amount: Option<Decimal>,
    pub file: Option<PathBuf>,
}

// csv infers `1.5` as f64 when asked for a self-describing value, which loses
// digits past ~15 significant ones. Going through the field text keeps it exact.
fn exact_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|value| Decimal::from_str_exact(&value).map_err(de::Error::custom))
        .transpose()
}

/// Parses an operation script in CSV format, yielding every row together with
/// its line number. Malformed rows are yielded as errors, parsing goes on
/// after them.
pub struct CsvOperationParser<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    record: StringRecord,
    done: bool,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            done: false,
        })
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Operation, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map_or(0, Position::line);
                Some((line, self.record.deserialize(Some(&self.headers))))
            }
            Err(err) => {
                // the underlying reader is broken, nothing more will come out of it
                self.done = err.is_io_error();
                let line = err.position().map_or(0, Position::line);
                Some((line, Err(err)))
            }
        }
    }
}
