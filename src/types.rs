//! Statement model produced by the OFX parser.

use crate::error::Error;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account a statement belongs to.
///
/// The set is closed on purpose: every section lookup matches on it
/// exhaustively, so a new account type has to be handled everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Bank message set (`BANKMSGSRSV1`).
    Bank,
    /// Credit-card message set (`CREDITCARDMSGSRSV1`).
    CreditCard,
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bank" => Ok(AccountType::Bank),
            "cc" | "creditcard" | "credit-card" | "credit_card" => Ok(AccountType::CreditCard),
            _ => Err(Error::UnsupportedAccountType(s.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Bank => f.write_str("bank"),
            AccountType::CreditCard => f.write_str("credit card"),
        }
    }
}

/// Logical region of a statement whose location depends on the account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    SignOn,
    AccountInfo,
    Transactions,
    Balance,
    Currency,
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "signon" | "sign-on" | "sign_on" => Ok(Section::SignOn),
            "account" | "accountinfo" | "account-info" | "account_info" => {
                Ok(Section::AccountInfo)
            }
            "transactions" => Ok(Section::Transactions),
            "balance" => Ok(Section::Balance),
            "currency" => Ok(Section::Currency),
            _ => Err(Error::UnsupportedSection(s.to_string())),
        }
    }
}

/// A parsed OFX statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementDocument {
    /// Account type the statement was classified as.
    pub account_type: AccountType,

    /// Default currency of the statement (`CURDEF`).
    pub currency: String,

    /// Sign-on response metadata.
    pub sign_on: SignOn,

    /// Identity of the account the statement is for.
    pub account: AccountIdentity,

    /// Ledger and available balances.
    pub balance: BalanceSnapshot,

    /// Start of the statement period, present whenever the transaction list is.
    pub statement_start: Option<NaiveDateTime>,

    /// End of the statement period, present whenever the transaction list is.
    pub statement_end: Option<NaiveDateTime>,

    /// Transactions in the order they appear in the file.
    pub transactions: Vec<Transaction>,
}

/// Sign-on response (`SONRS`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignOn {
    /// Sign-on status block.
    pub status: Option<Status>,

    /// Server date and time (`DTSERVER`).
    pub server_date: Option<NaiveDateTime>,

    /// Response language (`LANGUAGE`).
    pub language: Option<String>,

    /// Financial institution (`FI`).
    pub institution: Option<FinancialInstitution>,

    /// Intuit bank id, sent by institutions that target Quicken (`INTU.BID`).
    pub intu_bid: Option<String>,
}

/// OFX `STATUS` aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub code: String,
    pub severity: String,
    pub message: Option<String>,
}

/// OFX `FI` aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInstitution {
    pub organization: Option<String>,
    pub fid: Option<String>,
}

/// Identity of a statement account; the variant decides which fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccountIdentity {
    Bank(BankAccount),
    CreditCard(CreditCardAccount),
}

impl AccountIdentity {
    /// Account number, present for every account type.
    pub fn account_id(&self) -> &str {
        match self {
            AccountIdentity::Bank(bank) => &bank.account_id,
            AccountIdentity::CreditCard(card) => &card.account_id,
        }
    }
}

/// Bank account (`BANKACCTFROM` / `BANKACCTTO`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Routing/transit number (`BANKID`).
    pub bank_id: String,

    /// Branch (`BRANCHID`), omitted by many institutions.
    pub branch_id: Option<String>,

    /// Account number (`ACCTID`).
    pub account_id: String,

    /// Checksum key (`ACCTKEY`).
    pub account_key: Option<String>,

    /// Account kind (`ACCTTYPE`).
    pub kind: BankAccountKind,
}

/// Credit-card account (`CCACCTFROM` / `CCACCTTO`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardAccount {
    /// Card account number (`ACCTID`).
    pub account_id: String,

    /// Checksum key (`ACCTKEY`).
    pub account_key: Option<String>,
}

/// Bank account kind (`ACCTTYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankAccountKind {
    Checking,
    Savings,
    MoneyMarket,
    CreditLine,
    Cd,
}

impl FromStr for BankAccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHECKING" => Ok(BankAccountKind::Checking),
            "SAVINGS" => Ok(BankAccountKind::Savings),
            "MONEYMRKT" => Ok(BankAccountKind::MoneyMarket),
            "CREDITLINE" => Ok(BankAccountKind::CreditLine),
            "CD" => Ok(BankAccountKind::Cd),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

/// Ledger and available balances of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Ledger balance (`LEDGERBAL`).
    pub ledger: BalanceAmount,

    /// Available balance (`AVAILBAL`); several institutions never send it.
    pub available: Option<BalanceAmount>,
}

/// An amount together with the moment it was valid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAmount {
    /// Balance amount (`BALAMT`).
    pub amount: Decimal,

    /// As-of date (`DTASOF`).
    pub as_of: NaiveDateTime,
}

/// Represents a statement transaction (`STMTTRN`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction type (`TRNTYPE`).
    pub transaction_type: TransactionType,

    /// Date posted (`DTPOSTED`).
    pub posted: NaiveDateTime,

    /// Date the user initiated the transaction (`DTUSER`).
    pub user_date: Option<NaiveDateTime>,

    /// Date the funds become available (`DTAVAIL`).
    pub available_date: Option<NaiveDateTime>,

    /// Signed amount (`TRNAMT`).
    pub amount: Decimal,

    /// Currency, always the statement's `CURDEF`.
    pub currency: String,

    /// Financial institution transaction id (`FITID`).
    pub fit_id: String,

    /// Id of the transaction this one corrects (`CORRECTFITID`).
    pub correct_fit_id: Option<String>,

    /// What the correction does (`CORRECTACTION`).
    pub correct_action: Option<CorrectionAction>,

    /// Server transaction id (`SRVRTID`).
    pub server_transaction_id: Option<String>,

    /// Check number (`CHECKNUM`).
    pub check_number: Option<String>,

    /// Reference number (`REFNUM`).
    pub reference_number: Option<String>,

    /// Standard industrial code (`SIC`).
    pub sic: Option<String>,

    /// Payee id (`PAYEEID`).
    pub payee_id: Option<String>,

    /// Payee name (`NAME`).
    pub name: Option<String>,

    /// Memo (`MEMO`).
    pub memo: Option<String>,

    /// Counterparty account for transfers (`BANKACCTTO` / `CCACCTTO`).
    pub counterparty: Option<AccountIdentity>,
}

/// OFX transaction type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Credit,
    Debit,
    Int,
    Div,
    Fee,
    SrvChg,
    Dep,
    Atm,
    Pos,
    Xfer,
    Check,
    Payment,
    Cash,
    DirectDep,
    DirectDebit,
    RepeatPmt,
    Other,
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREDIT" => Ok(TransactionType::Credit),
            "DEBIT" => Ok(TransactionType::Debit),
            "INT" => Ok(TransactionType::Int),
            "DIV" => Ok(TransactionType::Div),
            "FEE" => Ok(TransactionType::Fee),
            "SRVCHG" => Ok(TransactionType::SrvChg),
            "DEP" => Ok(TransactionType::Dep),
            "ATM" => Ok(TransactionType::Atm),
            "POS" => Ok(TransactionType::Pos),
            "XFER" => Ok(TransactionType::Xfer),
            "CHECK" => Ok(TransactionType::Check),
            "PAYMENT" => Ok(TransactionType::Payment),
            "CASH" => Ok(TransactionType::Cash),
            "DIRECTDEP" => Ok(TransactionType::DirectDep),
            "DIRECTDEBIT" => Ok(TransactionType::DirectDebit),
            "REPEATPMT" => Ok(TransactionType::RepeatPmt),
            "OTHER" => Ok(TransactionType::Other),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl TransactionType {
    /// OFX code for this type.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Int => "INT",
            TransactionType::Div => "DIV",
            TransactionType::Fee => "FEE",
            TransactionType::SrvChg => "SRVCHG",
            TransactionType::Dep => "DEP",
            TransactionType::Atm => "ATM",
            TransactionType::Pos => "POS",
            TransactionType::Xfer => "XFER",
            TransactionType::Check => "CHECK",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Cash => "CASH",
            TransactionType::DirectDep => "DIRECTDEP",
            TransactionType::DirectDebit => "DIRECTDEBIT",
            TransactionType::RepeatPmt => "REPEATPMT",
            TransactionType::Other => "OTHER",
        }
    }
}

/// Correction action (`CORRECTACTION`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionAction {
    Replace,
    Delete,
}

impl FromStr for CorrectionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REPLACE" => Ok(CorrectionAction::Replace),
            "DELETE" => Ok(CorrectionAction::Delete),
            _ => Err(format!("Invalid correction action: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_from_str() {
        assert_eq!("bank".parse::<AccountType>().unwrap(), AccountType::Bank);
        assert_eq!("CC".parse::<AccountType>().unwrap(), AccountType::CreditCard);
        assert!(matches!(
            "brokerage".parse::<AccountType>(),
            Err(Error::UnsupportedAccountType(ref name)) if name == "brokerage"
        ));
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("signon".parse::<Section>().unwrap(), Section::SignOn);
        assert_eq!("Currency".parse::<Section>().unwrap(), Section::Currency);
        assert!(matches!(
            "positions".parse::<Section>(),
            Err(Error::UnsupportedSection(ref name)) if name == "positions"
        ));
    }

    #[test]
    fn test_transaction_type_codes() {
        for code in ["CREDIT", "DEBIT", "SRVCHG", "DIRECTDEP", "REPEATPMT", "OTHER"] {
            let parsed = code.parse::<TransactionType>().unwrap();
            assert_eq!(parsed.code(), code);
        }
        assert_eq!("pos".parse::<TransactionType>().ok(), Some(TransactionType::Pos));
        assert!("REFUND".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_bank_account_kind() {
        assert_eq!("MONEYMRKT".parse::<BankAccountKind>().ok(), Some(BankAccountKind::MoneyMarket));
        assert!("BROKERAGE".parse::<BankAccountKind>().is_err());
    }

    #[test]
    fn test_account_id() {
        let card = AccountIdentity::CreditCard(CreditCardAccount {
            account_id: "4111".into(),
            account_key: None,
        });
        assert_eq!(card.account_id(), "4111");
    }
}
