//! OFX Statement Library
//!
//! A library for reading OFX (Open Financial Exchange) bank and credit-card
//! statements into typed Rust values.
//!
//! # Supported Formats
//!
//! - **OFX 1.x**: SGML with a colon-delimited `OFXHEADER:100` header
//! - **OFX 2.x**: well-formed XML
//!
//! Files of both dialects produce the same [`StatementDocument`]: account
//! identity, sign-on metadata, ledger and available balances, and the
//! transactions in file order.
//!
//! # Examples
//!
//! ## Parsing a statement
//!
//! ```no_run
//! use std::fs::File;
//! use ofx_statement::{AccountIdentity, StatementDocument};
//!
//! let mut file = File::open("statement.ofx")?;
//! let statement = StatementDocument::from_read(&mut file, None)?;
//!
//! if let AccountIdentity::Bank(bank) = &statement.account {
//!     println!("Bank {} account {}", bank.bank_id, bank.account_id);
//! }
//! for transaction in &statement.transactions {
//!     println!("{} {} {}", transaction.posted, transaction.amount, transaction.currency);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Exporting transactions to CSV
//!
//! ```no_run
//! use std::fs::File;
//! use ofx_statement::{csv_format::CsvStatement, StatementDocument};
//!
//! let mut input = File::open("extrato.ofx")?;
//! let statement = StatementDocument::from_read(&mut input, Some("windows-1252"))?;
//!
//! let mut output = File::create("extrato.csv")?;
//! CsvStatement { statement }.write_to(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod dialect;
pub mod sgml;
pub mod tree;
pub mod schema;
pub mod transactions;
pub mod document;
pub mod encoding;
pub mod csv_format;

mod values;

use std::str::FromStr;

// Re-export commonly used types
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use types::{
    AccountIdentity, AccountType, BalanceAmount, BalanceSnapshot, BankAccount, BankAccountKind,
    CreditCardAccount, Section, SignOn, StatementDocument, Transaction, TransactionType,
};

/// Parse an OFX file that is already decoded to text.
pub fn parse(text: &str) -> Result<StatementDocument> {
    StatementDocument::parse(text)
}

/// Parse raw OFX bytes with an optional encoding label.
pub fn parse_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<StatementDocument> {
    StatementDocument::from_bytes(bytes, encoding)
}

/// Output formats of the export tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One CSV row per transaction
    Csv,
    /// Human readable statement summary
    Text,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" | "summary" => Ok(ExportFormat::Text),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("summary".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("ofx".parse::<ExportFormat>().is_err());
    }
}
