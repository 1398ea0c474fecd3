//! Transaction list extraction.

use crate::error::{Error, Result};
use crate::schema::resolve_path;
use crate::tree::{Node, Tree};
use crate::types::{AccountType, Section, Transaction, TransactionType};
use crate::values::{
    optional_code, optional_date, optional_text, parse_ofx_datetime, read_account,
    required_amount, required_code, required_date, required_text,
};
use chrono::NaiveDateTime;
use tracing::debug;

/// Statement period and transactions read from `BANKTRANLIST`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionList {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub transactions: Vec<Transaction>,
}

/// Read the transaction list of a statement.
///
/// A statement without a transaction list yields an empty list. When the
/// list exists, a `DTSTART` and a `DTEND` somewhere below it are required.
pub fn extract(tree: &Tree, account_type: AccountType, currency: &str) -> Result<TransactionList> {
    let path = resolve_path(account_type, Section::Transactions);
    let Some(list) = tree.select(path) else {
        debug!(path, "statement has no transaction list");
        return Ok(TransactionList::default());
    };

    let start = period_date(list, "DTSTART")?;
    let end = period_date(list, "DTEND")?;

    let transactions = list
        .descendants("STMTTRN")
        .into_iter()
        .map(|node| parse_transaction(node, currency))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = transactions.len(), "extracted transactions");

    Ok(TransactionList {
        start: Some(start),
        end: Some(end),
        transactions,
    })
}

fn period_date(list: &Node, name: &str) -> Result<NaiveDateTime> {
    let value = list
        .find(name)
        .and_then(Node::text)
        .ok_or_else(|| Error::MalformedDate(format!("{}//{} is missing", list.name(), name)))?;
    parse_ofx_datetime(value)
}

fn parse_transaction(node: &Node, currency: &str) -> Result<Transaction> {
    let counterparty = match (node.child("BANKACCTTO"), node.child("CCACCTTO")) {
        (Some(bank), _) => Some(read_account(bank, AccountType::Bank)?),
        (None, Some(card)) => Some(read_account(card, AccountType::CreditCard)?),
        (None, None) => None,
    };

    Ok(Transaction {
        transaction_type: required_code::<TransactionType>(node, "TRNTYPE")?,
        posted: required_date(node, "DTPOSTED")?,
        user_date: optional_date(node, "DTUSER")?,
        available_date: optional_date(node, "DTAVAIL")?,
        amount: required_amount(node, "TRNAMT")?,
        currency: currency.to_string(),
        fit_id: required_text(node, "FITID")?.to_string(),
        correct_fit_id: optional_text(node, "CORRECTFITID"),
        correct_action: optional_code(node, "CORRECTACTION")?,
        server_transaction_id: optional_text(node, "SRVRTID"),
        check_number: optional_text(node, "CHECKNUM"),
        reference_number: optional_text(node, "REFNUM"),
        sic: optional_text(node, "SIC"),
        payee_id: optional_text(node, "PAYEEID"),
        name: optional_text(node, "NAME"),
        memo: optional_text(node, "MEMO"),
        counterparty,
    })
}
