//! CSV export of statement transactions.

use crate::error::Result;
use crate::types::StatementDocument;
use csv::Writer;
use serde::Serialize;
use std::io::Write;

/// A statement to be written as CSV, one row per transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvStatement {
    /// The underlying statement data.
    pub statement: StatementDocument,
}

/// CSV transaction record structure.
#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    transaction_type: &'static str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Currency")]
    currency: &'a str,
    #[serde(rename = "FITID")]
    fit_id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Memo")]
    memo: &'a str,
    #[serde(rename = "Check Number")]
    check_number: &'a str,
}

impl CsvStatement {
    /// Write the transactions to any destination implementing `Write`.
    ///
    /// # Arguments
    ///
    /// * `writer` - A mutable reference to a type implementing `Write`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use ofx_statement::csv_format::CsvStatement;
    /// use ofx_statement::StatementDocument;
    ///
    /// let statement = StatementDocument::from_read(&mut File::open("statement.ofx")?, None)?;
    /// let csv = CsvStatement { statement };
    /// let mut file = File::create("output.csv")?;
    /// csv.write_to(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv_writer = Writer::from_writer(writer);

        for transaction in &self.statement.transactions {
            let record = CsvRecord {
                date: transaction.posted.format("%Y-%m-%d").to_string(),
                transaction_type: transaction.transaction_type.code(),
                amount: transaction.amount.to_string(),
                currency: &transaction.currency,
                fit_id: &transaction.fit_id,
                name: transaction.name.as_deref().unwrap_or_default(),
                memo: transaction.memo.as_deref().unwrap_or_default(),
                check_number: transaction.check_number.as_deref().unwrap_or_default(),
            };

            csv_writer.serialize(record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
