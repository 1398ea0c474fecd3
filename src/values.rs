//! Typed readers for OFX element values.

use crate::error::{Error, Result};
use crate::tree::Node;
use crate::types::{
    AccountIdentity, AccountType, BalanceAmount, BankAccount, BankAccountKind, CreditCardAccount,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Text of a required child element.
pub(crate) fn required_text<'a>(node: &'a Node, name: &str) -> Result<&'a str> {
    node.child_text(name)
        .ok_or_else(|| Error::MissingField(format!("{}/{}", node.name(), name)))
}

pub(crate) fn optional_text(node: &Node, name: &str) -> Option<String> {
    node.child_text(name).map(str::to_string)
}

/// Date of a required child element; absence is a malformed date, not a default.
pub(crate) fn required_date(node: &Node, name: &str) -> Result<NaiveDateTime> {
    let value = node
        .child_text(name)
        .ok_or_else(|| Error::MalformedDate(format!("{}/{} is missing", node.name(), name)))?;
    parse_ofx_datetime(value)
}

pub(crate) fn optional_date(node: &Node, name: &str) -> Result<Option<NaiveDateTime>> {
    node.child_text(name).map(parse_ofx_datetime).transpose()
}

/// Parse a child element's code into a closed enum.
pub(crate) fn required_code<T: FromStr>(node: &Node, name: &str) -> Result<T> {
    let value = required_text(node, name)?;
    value.parse::<T>().map_err(|_| Error::InvalidField {
        field: name.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn optional_code<T: FromStr>(node: &Node, name: &str) -> Result<Option<T>> {
    match node.child_text(name) {
        Some(value) => value.parse::<T>().map(Some).map_err(|_| Error::InvalidField {
            field: name.to_string(),
            value: value.to_string(),
        }),
        None => Ok(None),
    }
}

/// Parse an OFX datetime: `YYYYMMDD[HHMM[SS[.XXX]]][[offset:TZ]]`.
///
/// Fractional seconds and the timezone bracket are dropped; the wall-clock
/// time is kept as written.
pub(crate) fn parse_ofx_datetime(value: &str) -> Result<NaiveDateTime> {
    let malformed = || Error::MalformedDate(value.to_string());

    let stamp = value.trim();
    let stamp = stamp.split('[').next().unwrap_or(stamp).trim();
    let stamp = stamp.split('.').next().unwrap_or(stamp);

    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32> {
        stamp
            .get(range)
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(malformed)
    };

    let (hour, minute, second) = match stamp.len() {
        8 => (0, 0, 0),
        12 => (field(8..10)?, field(10..12)?, 0),
        14 => (field(8..10)?, field(10..12)?, field(12..14)?),
        _ => return Err(malformed()),
    };

    let year = field(0..4)? as i32;
    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(malformed)
}

/// Parse a signed OFX amount. A comma decimal separator is accepted.
pub(crate) fn parse_amount(value: &str) -> Result<Decimal> {
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let normalized = if unsigned.contains(',') && !unsigned.contains('.') {
        unsigned.replace(',', ".")
    } else {
        unsigned.to_string()
    };

    Decimal::from_str(&normalized).map_err(|_| Error::InvalidAmount(value.to_string()))
}

pub(crate) fn required_amount(node: &Node, name: &str) -> Result<Decimal> {
    parse_amount(required_text(node, name)?)
}

/// Read an account aggregate (`BANKACCTFROM`, `CCACCTTO`, ...).
pub(crate) fn read_account(node: &Node, account_type: AccountType) -> Result<AccountIdentity> {
    let account_id = required_text(node, "ACCTID")?.to_string();
    let account_key = optional_text(node, "ACCTKEY");

    match account_type {
        AccountType::Bank => Ok(AccountIdentity::Bank(BankAccount {
            bank_id: required_text(node, "BANKID")?.to_string(),
            branch_id: optional_text(node, "BRANCHID"),
            account_id,
            account_key,
            kind: required_code::<BankAccountKind>(node, "ACCTTYPE")?,
        })),
        AccountType::CreditCard => Ok(AccountIdentity::CreditCard(CreditCardAccount {
            account_id,
            account_key,
        })),
    }
}

/// Read a `LEDGERBAL` or `AVAILBAL` aggregate.
pub(crate) fn read_balance_amount(node: &Node) -> Result<BalanceAmount> {
    Ok(BalanceAmount {
        amount: required_amount(node, "BALAMT")?,
        as_of: required_date(node, "DTASOF")?,
    })
}
