//! Account domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of bank account shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Business,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Business => "business",
            AccountKind::Credit => "credit",
        }
    }
}

/// A bank account owned by the user
///
/// The balance is a display value. Submitting a transfer never changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// Full account number; only the masked form is ever displayed
    pub account_number: String,
    pub balance: Decimal,
    /// ISO 4217 currency code, normalized to uppercase
    pub currency: String,
}

impl Account {
    /// Create a new account with required fields
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        kind: AccountKind,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            account_number: account_number.into(),
            balance: Decimal::ZERO,
            currency: "USD".to_string(),
        }
    }

    pub fn with_balance(mut self, balance: Decimal, currency: &str) -> Self {
        self.balance = balance;
        self.currency = Self::normalize_currency(currency);
        self
    }

    /// Account number with everything but the last four digits hidden
    pub fn masked_number(&self) -> String {
        mask_account_number(&self.account_number)
    }

    /// Normalize currency code to uppercase
    pub fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("account name cannot be empty");
        }
        if self.currency.trim().is_empty() {
            return Err("currency cannot be empty");
        }
        Ok(())
    }
}

/// Saved transfer recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: Uuid,
    pub name: String,
    pub bank_name: String,
    pub account_number: String,
    /// ISO 3166-1 alpha-2 code of the recipient's bank
    pub country: String,
}

impl Beneficiary {
    pub fn masked_number(&self) -> String {
        mask_account_number(&self.account_number)
    }
}

/// Mask an account number as `****1234`
pub fn mask_account_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() <= 4 {
        return digits.into_iter().collect();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("****{}", last_four)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalization() {
        assert_eq!(Account::normalize_currency("usd"), "USD");
        assert_eq!(Account::normalize_currency(" eur "), "EUR");
    }

    #[test]
    fn test_masked_number() {
        let account = Account::new(Uuid::new_v4(), "Checking", AccountKind::Checking, "4000 1234 5678 9010");
        assert_eq!(account.masked_number(), "****9010");
        assert_eq!(mask_account_number("123"), "123");
    }

    #[test]
    fn test_account_validation() {
        let mut account = Account::new(Uuid::new_v4(), "Test Account", AccountKind::Savings, "12345678");
        assert!(account.validate().is_ok());

        account.name = "".to_string();
        assert!(account.validate().is_err());
    }
}
