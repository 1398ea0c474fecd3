//! Dialect and account type detection.
//!
//! Both checks are plain substring scans over the raw file. Nothing here
//! looks at the header beyond the `OFXHEADER:100` marker.

use crate::error::{Error, Result};
use crate::types::AccountType;
use tracing::debug;

const LEGACY_MARKER: &str = "OFXHEADER:100";
const CREDIT_CARD_MARKER: &str = "<CREDITCARDMSGSRSV1>";
const BANK_MARKER: &str = "<BANKMSGSRSV1>";

/// Markup dialect of an OFX file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// OFX 1.x, SGML with a colon-delimited header.
    Legacy,
    /// OFX 2.x, well-formed XML.
    Xml,
}

/// True when the file carries the OFX 1.x header marker.
pub fn is_legacy_dialect(text: &str) -> bool {
    text.contains(LEGACY_MARKER)
}

pub fn detect_dialect(text: &str) -> Dialect {
    if is_legacy_dialect(text) {
        Dialect::Legacy
    } else {
        Dialect::Xml
    }
}

/// Classify the account a file belongs to by its message-set marker.
///
/// The credit-card marker is checked first, so a file containing both
/// message sets is treated as a credit-card statement.
pub fn classify_account_type(text: &str) -> Result<AccountType> {
    let account_type = if text.contains(CREDIT_CARD_MARKER) {
        AccountType::CreditCard
    } else if text.contains(BANK_MARKER) {
        AccountType::Bank
    } else {
        return Err(Error::UnsupportedAccountType(
            "no bank or credit card message set found".to_string(),
        ));
    };

    debug!(%account_type, "classified account type");
    Ok(account_type)
}
