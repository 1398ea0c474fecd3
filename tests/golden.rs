//! Parsing of complete bank exports.

use chrono::{Datelike, Timelike};
use ofx_statement::{
    dialect, AccountIdentity, AccountType, BankAccountKind, Error, StatementDocument,
    TransactionType,
};
use pretty_assertions::assert_eq;

const ITAU: &[u8] = include_bytes!("fixtures/itau.ofx");
const BANCO_DO_BRASIL: &[u8] = include_bytes!("fixtures/bb.ofx");
const CREDIT_CARD: &str = include_str!("fixtures/creditcard.ofx");
const NO_TRANSACTIONS: &str = include_str!("fixtures/no_transactions.ofx");

fn memos(statement: &StatementDocument) -> Vec<&str> {
    statement
        .transactions
        .iter()
        .filter_map(|t| t.memo.as_deref())
        .collect()
}

#[test]
fn parses_itau_export() {
    let statement = ofx_statement::parse_bytes(ITAU, None).unwrap();

    assert_eq!(statement.account_type, AccountType::Bank);
    assert_eq!(statement.currency, "BRL");
    assert_eq!(statement.account.account_id(), "9999 99999-9");

    let AccountIdentity::Bank(bank) = &statement.account else {
        panic!("expected a bank account");
    };
    assert_eq!(bank.bank_id, "0341");
    assert_eq!(bank.branch_id, None);
    assert_eq!(bank.kind, BankAccountKind::Checking);

    assert_eq!(statement.transactions.len(), 3);
    assert_eq!(memos(&statement), vec!["RSHOP", "REND PAGO APLIC AUT MAIS", "SISDEB"]);
    assert!(statement.transactions.iter().all(|t| t.currency == "BRL"));
    assert_eq!(statement.transactions[0].amount.to_string(), "-45.90");
    assert_eq!(statement.transactions[1].transaction_type, TransactionType::Credit);

    assert_eq!(statement.balance.ledger.amount.to_string(), "1534.97");
    assert_eq!(statement.balance.available, None);
}

#[test]
fn parses_latin1_banco_do_brasil_export() {
    let statement = StatementDocument::from_bytes(BANCO_DO_BRASIL, Some("iso-8859-1")).unwrap();

    let AccountIdentity::Bank(bank) = &statement.account else {
        panic!("expected a bank account");
    };
    assert_eq!(bank.account_id, "99999-9");
    assert_eq!(bank.branch_id.as_deref(), Some("9999-9"));
    assert_eq!(bank.bank_id, "1");

    assert_eq!(statement.transactions.len(), 3);
    assert_eq!(
        memos(&statement),
        vec!["Transferência Agendada", "Compra com Cartão", "Saque"]
    );
    assert_eq!(statement.transactions[1].amount.to_string(), "-89.90");
    assert_eq!(statement.transactions[1].reference_number.as_deref(), Some("654.321"));

    let available = statement.balance.available.as_ref().unwrap();
    assert_eq!(available.amount.to_string(), "480.10");
    assert_eq!(
        statement.sign_on.institution.as_ref().and_then(|fi| fi.organization.as_deref()),
        Some("Banco do Brasil")
    );
}

#[test]
fn header_charset_is_used_when_no_encoding_is_given() {
    let explicit = StatementDocument::from_bytes(BANCO_DO_BRASIL, Some("windows-1252")).unwrap();
    let defaulted = StatementDocument::from_bytes(BANCO_DO_BRASIL, None).unwrap();
    assert_eq!(explicit, defaulted);
}

#[test]
fn parses_xml_credit_card_statement() {
    assert_eq!(dialect::detect_dialect(CREDIT_CARD), dialect::Dialect::Xml);

    let statement = ofx_statement::parse(CREDIT_CARD).unwrap();

    assert_eq!(statement.account_type, AccountType::CreditCard);
    assert_eq!(statement.currency, "USD");
    match &statement.account {
        AccountIdentity::CreditCard(card) => assert_eq!(card.account_id, "4111111111111111"),
        other => panic!("expected a credit card account, got {:?}", other),
    }

    let first = &statement.transactions[0];
    assert_eq!(first.name.as_deref(), Some("AT&T WIRELESS"));
    assert_eq!(first.user_date.map(|d| d.day()), Some(10));
    assert_eq!(statement.transactions[1].transaction_type, TransactionType::Payment);
    assert_eq!(statement.transactions[1].memo, None);

    let end = statement.statement_end.unwrap();
    assert_eq!((end.day(), end.hour(), end.minute()), (31, 23, 59));
    assert_eq!(statement.sign_on.intu_bid.as_deref(), Some("10898"));
    assert_eq!(statement.balance.ledger.amount.to_string(), "-1023.45");
}

#[test]
fn xml_and_legacy_routes_agree() {
    let direct = StatementDocument::parse(CREDIT_CARD).unwrap();

    let legacy = format!("OFXHEADER:100\nDATA:OFXSGML\nVERSION:102\n\n{}", CREDIT_CARD);
    assert_eq!(dialect::detect_dialect(&legacy), dialect::Dialect::Legacy);
    let normalized = StatementDocument::parse(&legacy).unwrap();

    assert_eq!(direct, normalized);
}

#[test]
fn statement_without_transaction_list() {
    let statement = StatementDocument::parse(NO_TRANSACTIONS).unwrap();

    assert!(statement.transactions.is_empty());
    assert_eq!(statement.statement_start, None);
    assert_eq!(statement.balance.ledger.amount.to_string(), "2500.00");
    assert!(matches!(
        statement.account,
        AccountIdentity::Bank(ref bank) if bank.kind == BankAccountKind::Savings
    ));
}

#[test]
fn removing_sections_fails_with_their_names() {
    let cases = [
        ("<CURDEF>USD\n", "currency"),
        ("<LEDGERBAL>\n<BALAMT>2500.00\n<DTASOF>20240301\n</LEDGERBAL>\n", "balance"),
    ];

    for (section, name) in cases {
        let text = NO_TRANSACTIONS.replace(section, "");
        assert_ne!(text, NO_TRANSACTIONS, "fixture must contain {:?}", section);
        match StatementDocument::parse(&text) {
            Err(Error::MissingSection(ref missing)) => assert_eq!(missing, name),
            other => panic!("expected missing {}, got {:?}", name, other),
        }
    }
}

#[test]
fn parsing_is_deterministic() {
    let first = ofx_statement::parse_bytes(ITAU, None).unwrap();
    let second = ofx_statement::parse_bytes(ITAU, None).unwrap();
    assert_eq!(first, second);
}
