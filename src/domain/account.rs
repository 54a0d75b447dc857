//! Account identifiers
//!
//! Accounts are provisioned outside this worker. The engine only needs the
//! identifier (validated before any storage access) and the current balance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of an account identifier (matches `account.id VARCHAR(64)`)
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Validated account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    #[error("account id is required")]
    Empty,

    #[error("account id exceeds {MAX_ACCOUNT_ID_LEN} characters")]
    TooLong,
}

impl AccountId {
    pub fn parse(raw: &str) -> Result<Self, AccountIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if trimmed.chars().count() > MAX_ACCOUNT_ID_LEN {
            return Err(AccountIdError::TooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_trims() {
        let id = AccountId::parse("  acc-1 ").unwrap();
        assert_eq!(id.as_str(), "acc-1");
        assert_eq!(id.to_string(), "acc-1");
    }

    #[test]
    fn test_account_id_empty() {
        assert_eq!(AccountId::parse(""), Err(AccountIdError::Empty));
        assert_eq!(AccountId::parse(" \t "), Err(AccountIdError::Empty));
    }

    #[test]
    fn test_account_id_length_limit() {
        let max = "a".repeat(MAX_ACCOUNT_ID_LEN);
        assert!(AccountId::parse(&max).is_ok());

        let too_long = "a".repeat(MAX_ACCOUNT_ID_LEN + 1);
        assert_eq!(AccountId::parse(&too_long), Err(AccountIdError::TooLong));
    }

    #[test]
    fn test_account_id_deserialize_validates() {
        let id: AccountId = serde_json::from_str("\"acc-9\"").unwrap();
        assert_eq!(id.as_str(), "acc-9");
        assert!(serde_json::from_str::<AccountId>("\"\"").is_err());
    }
}
