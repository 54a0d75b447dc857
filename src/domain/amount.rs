//! Amount type
//!
//! Domain primitive for monetary amounts with business rule validation.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot reach the storage layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclusive upper bound of a NUMERIC(18, 2) column (16 integer digits)
fn storage_limit() -> Decimal {
    Decimal::new(10_000_000_000_000_000, 0)
}

/// Currency precision: every balance column is NUMERIC(18, 2)
pub const CURRENCY_SCALE: u32 = 2;

/// Amount represents a validated, strictly positive transfer amount.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - At most 2 decimal places, stored rescaled to exactly 2
/// - Fits the NUMERIC(18, 2) balance column (below 10^16)
///
/// # Example
/// ```
/// use ledger_worker::domain::Amount;
///
/// let amount: Amount = "10.5".parse().unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount has too many decimal places (max {CURRENCY_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount does not fit the balance column (must be below 10000000000000000)")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if value >= 10^16
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        // Trailing zeros ("1.500") are fine, real sub-cent digits are not
        let normalized = value.normalize();
        if normalized.scale() > CURRENCY_SCALE {
            return Err(AmountError::TooManyDecimals(normalized.scale()));
        }

        if value >= storage_limit() {
            return Err(AmountError::Overflow);
        }

        let mut value = normalized;
        value.rescale(CURRENCY_SCALE);
        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::ParseError("empty".to_string()));
        }
        let decimal = Decimal::from_str_exact(trimmed)
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::from_str(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

/// Balance of an account row as stored.
///
/// Balances are signed: provisioning may load overdrawn accounts, and this
/// engine never rejects a read because of the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Balance(Decimal);

impl Balance {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if balance is sufficient for withdrawal
    pub fn covers(&self, amount: &Amount) -> bool {
        self.0 >= amount.value()
    }

    /// Balance after crediting `amount`
    pub fn credited(&self, amount: &Amount) -> Balance {
        Balance(self.0 + amount.value())
    }

    /// Balance after debiting `amount`
    pub fn debited(&self, amount: &Amount) -> Balance {
        Balance(self.0 - amount.value())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
