//! Building a [`StatementDocument`] from an OFX file.
//!
//! Sections are read in a fixed order and each required one is a gate:
//! currency, sign-on, account, transactions, balance. The first failure
//! aborts the parse and nothing partial is returned.

use crate::dialect::{classify_account_type, detect_dialect, Dialect};
use crate::encoding;
use crate::error::{Error, Result};
use crate::schema::resolve_path;
use crate::sgml;
use crate::transactions;
use crate::tree::{Node, Tree};
use crate::types::{
    AccountType, BalanceSnapshot, FinancialInstitution, Section, SignOn, StatementDocument, Status,
};
use crate::values::{optional_date, optional_text, read_account, read_balance_amount, required_text};
use std::borrow::Cow;
use std::io::Read;
use tracing::{debug, info};

impl StatementDocument {
    /// Parse an OFX file that is already decoded to text.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ofx_statement::StatementDocument;
    ///
    /// let text = std::fs::read_to_string("statement.ofx")?;
    /// let statement = StatementDocument::parse(&text)?;
    /// println!("{} transactions", statement.transactions.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let dialect = detect_dialect(text);
        debug!(?dialect, "detected OFX dialect");

        let account_type = classify_account_type(text)?;

        let xml = match dialect {
            Dialect::Legacy => Cow::Owned(sgml::normalize(text)?),
            Dialect::Xml => Cow::Borrowed(text),
        };
        let tree = Tree::parse(&xml)?;

        let document = Self::from_tree(&tree, account_type)?;
        info!(
            account_type = %document.account_type,
            transactions = document.transactions.len(),
            "parsed OFX statement"
        );
        Ok(document)
    }

    /// Parse raw bytes, decoding them with `encoding` (an encoding label such
    /// as `"iso-8859-1"`) or the default when `None`.
    pub fn from_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<Self> {
        let text = encoding::decode(bytes, encoding)?;
        Self::parse(&text)
    }

    /// Parse an OFX statement from any source implementing `Read`.
    ///
    /// # Arguments
    ///
    /// * `reader` - A mutable reference to a type implementing `Read`
    /// * `encoding` - Optional encoding label overriding the default
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use ofx_statement::StatementDocument;
    ///
    /// let mut file = File::open("extrato.ofx")?;
    /// let statement = StatementDocument::from_read(&mut file, Some("iso-8859-1"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R, encoding: Option<&str>) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, encoding)
    }

    fn from_tree(tree: &Tree, account_type: AccountType) -> Result<Self> {
        let currency = tree
            .select(resolve_path(account_type, Section::Currency))
            .and_then(Node::text)
            .ok_or_else(|| Error::MissingSection("currency".to_string()))?
            .to_string();

        let sign_on_node = tree
            .select(resolve_path(account_type, Section::SignOn))
            .ok_or_else(|| Error::MissingSection("signon".to_string()))?;
        let sign_on = read_sign_on(sign_on_node)?;

        let account_node = tree
            .select(resolve_path(account_type, Section::AccountInfo))
            .ok_or_else(|| Error::MissingSection("account".to_string()))?;
        let account = read_account(account_node, account_type)?;

        let list = transactions::extract(tree, account_type, &currency)?;

        let balance = read_balance(tree, account_type)?;

        Ok(StatementDocument {
            account_type,
            currency,
            sign_on,
            account,
            balance,
            statement_start: list.start,
            statement_end: list.end,
            transactions: list.transactions,
        })
    }
}

fn read_sign_on(node: &Node) -> Result<SignOn> {
    let status = node
        .child("STATUS")
        .map(|status| -> Result<Status> {
            Ok(Status {
                code: required_text(status, "CODE")?.to_string(),
                severity: required_text(status, "SEVERITY")?.to_string(),
                message: optional_text(status, "MESSAGE"),
            })
        })
        .transpose()?;

    let institution = node.child("FI").map(|fi| FinancialInstitution {
        organization: optional_text(fi, "ORG"),
        fid: optional_text(fi, "FID"),
    });

    Ok(SignOn {
        status,
        server_date: optional_date(node, "DTSERVER")?,
        language: optional_text(node, "LANGUAGE"),
        institution,
        intu_bid: optional_text(node, "INTU.BID"),
    })
}

fn read_balance(tree: &Tree, account_type: AccountType) -> Result<BalanceSnapshot> {
    let statement = tree.select(resolve_path(account_type, Section::Balance));

    let ledger = statement
        .and_then(|node| node.child("LEDGERBAL"))
        .ok_or_else(|| Error::MissingSection("balance".to_string()))?;

    let available = match statement.and_then(|node| node.child("AVAILBAL")) {
        Some(node) => Some(read_balance_amount(node)?),
        None => {
            debug!("statement has no available balance");
            None
        }
    };

    Ok(BalanceSnapshot {
        ledger: read_balance_amount(ledger)?,
        available,
    })
}
