//! Form models and the flat field map they are validated as
//!
//! Forms hold raw user input as strings, exactly as typed. Nothing here is
//! persisted: a submitted form only feeds the receipt shown afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::country::FieldKind;
use super::result::Result;

/// Flat field name -> raw value map that validation schemas run against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten any serializable form into field values
    ///
    /// Booleans become "true"/"false", numbers their decimal text, nested
    /// objects are merged into the top level and `None` fields are left out.
    pub fn from_form<T: Serialize>(form: &T) -> Result<Self> {
        let mut data = Self::new();
        if let JsonValue::Object(map) = serde_json::to_value(form)? {
            for (key, value) in map {
                data.insert_json(key, value);
            }
        }
        Ok(data)
    }

    fn insert_json(&mut self, key: String, value: JsonValue) {
        match value {
            JsonValue::Null | JsonValue::Array(_) => {}
            JsonValue::String(s) => {
                self.0.insert(key, s);
            }
            JsonValue::Bool(b) => {
                self.0.insert(key, b.to_string());
            }
            JsonValue::Number(n) => {
                self.0.insert(key, n.to_string());
            }
            JsonValue::Object(inner) => {
                for (k, v) in inner {
                    self.insert_json(k, v);
                }
            }
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Value with surrounding whitespace removed; empty counts as absent
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_filled(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    pub fn is_true(&self, field: &str) -> bool {
        self.value(field) == Some("true")
    }
}

/// A single failed rule, reported next to its field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Ordered list of validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The first message reported for a field
    pub fn first_for(&self, path: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, path: &str) -> bool {
        self.first_for(path).is_some()
    }

    /// Field paths with at least one error, in report order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for error in &self.0 {
            if !paths.contains(&error.path.as_str()) {
                paths.push(&error.path);
            }
        }
        paths
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// =========================================================================
// Forms
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Online banking enrollment
///
/// `account_type` is "personal" or "business"; business enrollments also
/// need a business name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentForm {
    pub account_type: String,
    pub full_name: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

/// Transfer between two of the user's own accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub from_account: String,
    pub to_account: String,
    pub amount: String,
    pub description: Option<String>,
}

/// Cross-border transfer
///
/// `identifiers` holds the country-specific bank fields (IBAN, sort code...),
/// keyed by kind and flattened into the form's top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternationalTransferForm {
    pub from_account: String,
    pub recipient_name: String,
    pub recipient_country: String,
    pub bank_name: String,
    pub account_number: String,
    pub amount: String,
    pub currency: String,
    pub fee_payment_option: Option<String>,
    pub purpose: String,
    #[serde(flatten)]
    pub identifiers: BTreeMap<FieldKind, String>,
}

impl InternationalTransferForm {
    pub fn set_identifier(&mut self, kind: FieldKind, value: impl Into<String>) {
        self.identifiers.insert(kind, value.into());
    }

    pub fn identifier(&self, kind: FieldKind) -> Option<&str> {
        self.identifiers.get(&kind).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapForm {
    pub from_asset: String,
    pub to_asset: String,
    pub amount: String,
}

/// Multi-step loan application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplicationForm {
    // Step 1: personal details
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    // Step 2: employment
    pub employment_status: String,
    pub employer_name: Option<String>,
    pub annual_income: String,
    // Step 3: loan details
    pub loan_type: String,
    pub loan_amount: String,
    pub loan_term: String,
    pub purpose: String,
    pub existing_customer: bool,
    pub account_number: Option<String>,
    // Step 4: review
    pub agree_to_terms: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePinForm {
    pub current_pin: String,
    pub new_pin: String,
    pub confirm_pin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data_flattens_identifiers() {
        let mut form = InternationalTransferForm {
            recipient_country: "DE".to_string(),
            ..Default::default()
        };
        form.set_identifier(FieldKind::Iban, "DE89370400440532013000");

        let data = FormData::from_form(&form).unwrap();
        assert_eq!(data.get("recipientCountry"), Some("DE"));
        assert_eq!(data.get("iban"), Some("DE89370400440532013000"));
        assert!(data.get("feePaymentOption").is_none());
    }

    #[test]
    fn test_form_data_booleans_and_blanks() {
        let form = LoanApplicationForm {
            existing_customer: true,
            full_name: "   ".to_string(),
            ..Default::default()
        };
        let data = FormData::from_form(&form).unwrap();
        assert!(data.is_true("existingCustomer"));
        assert!(!data.is_true("agreeToTerms"));
        assert!(!data.is_filled("fullName"));
    }

    #[test]
    fn test_validation_errors_lookup() {
        let mut errors = ValidationErrors::default();
        errors.push("email", "Invalid email address");
        errors.push("email", "Email is required");
        errors.push("phone", "Phone number is required");

        assert_eq!(errors.first_for("email"), Some("Invalid email address"));
        assert_eq!(errors.paths(), vec!["email", "phone"]);
        assert!(!errors.has("amount"));
    }
}
