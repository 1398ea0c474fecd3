//! Location of each statement section for each account type.

use crate::error::Result;
use crate::types::{AccountType, Section};

const SIGN_ON: &str = "/OFX/SIGNONMSGSRSV1/SONRS";

const BANK_STATEMENT: &str = "/OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS";
const BANK_ACCOUNT: &str = "/OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS/BANKACCTFROM";
const BANK_TRANSACTIONS: &str = "/OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS/BANKTRANLIST";
const BANK_CURRENCY: &str = "/OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS/CURDEF";

const CC_STATEMENT: &str = "/OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS";
const CC_ACCOUNT: &str = "/OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS/CCACCTFROM";
const CC_TRANSACTIONS: &str = "/OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS/BANKTRANLIST";
const CC_CURRENCY: &str = "/OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS/CURDEF";

/// Absolute tree path of `section` in a statement of `account_type`.
///
/// The balance path points at the statement aggregate itself; the ledger
/// and available balances are its `LEDGERBAL` and `AVAILBAL` children.
pub fn resolve_path(account_type: AccountType, section: Section) -> &'static str {
    match (account_type, section) {
        (_, Section::SignOn) => SIGN_ON,

        (AccountType::Bank, Section::AccountInfo) => BANK_ACCOUNT,
        (AccountType::Bank, Section::Balance) => BANK_STATEMENT,
        (AccountType::Bank, Section::Transactions) => BANK_TRANSACTIONS,
        (AccountType::Bank, Section::Currency) => BANK_CURRENCY,

        (AccountType::CreditCard, Section::AccountInfo) => CC_ACCOUNT,
        (AccountType::CreditCard, Section::Balance) => CC_STATEMENT,
        (AccountType::CreditCard, Section::Transactions) => CC_TRANSACTIONS,
        (AccountType::CreditCard, Section::Currency) => CC_CURRENCY,
    }
}

/// Resolve a path from account type and section names.
///
/// Fails with `UnsupportedAccountType` or `UnsupportedSection` for names
/// outside the supported sets.
pub fn resolve_named(account_type: &str, section: &str) -> Result<&'static str> {
    let account_type = account_type.parse::<AccountType>()?;
    let section = section.parse::<Section>()?;
    Ok(resolve_path(account_type, section))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_account_info_depends_on_account_type() {
        assert!(resolve_path(AccountType::Bank, Section::AccountInfo).ends_with("/BANKACCTFROM"));
        assert!(
            resolve_path(AccountType::CreditCard, Section::AccountInfo).ends_with("/CCACCTFROM")
        );
    }

    #[test]
    fn test_shared_suffixes() {
        for account_type in [AccountType::Bank, AccountType::CreditCard] {
            let root = resolve_path(account_type, Section::Balance);
            assert_eq!(
                resolve_path(account_type, Section::Transactions),
                format!("{}/BANKTRANLIST", root)
            );
            assert_eq!(
                resolve_path(account_type, Section::Currency),
                format!("{}/CURDEF", root)
            );
        }
    }

    #[test]
    fn test_sign_on_is_global() {
        assert_eq!(
            resolve_path(AccountType::Bank, Section::SignOn),
            resolve_path(AccountType::CreditCard, Section::SignOn)
        );
    }

    #[test]
    fn test_resolve_named() {
        assert_eq!(resolve_named("cc", "currency").unwrap(), CC_CURRENCY);
        assert!(matches!(
            resolve_named("loan", "currency"),
            Err(Error::UnsupportedAccountType(_))
        ));
        assert!(matches!(
            resolve_named("bank", "holdings"),
            Err(Error::UnsupportedSection(_))
        ));
    }
}
