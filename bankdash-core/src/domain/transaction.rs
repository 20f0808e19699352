//! Transaction submission models
//!
//! A submission never moves money: receipts only echo the request back
//! with a reference and timestamps.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Transfer,
    InternationalTransfer,
    Swap,
    LoanApplication,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Transfer => "transfer",
            TransactionKind::InternationalTransfer => "international_transfer",
            TransactionKind::Swap => "swap",
            TransactionKind::LoanApplication => "loan_application",
        }
    }
}

/// Who pays the international transfer fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeePaymentOption {
    Sender,
    Recipient,
    Shared,
}

impl FeePaymentOption {
    pub const VALUES: [&'static str; 3] = ["sender", "recipient", "shared"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "sender" => Some(FeePaymentOption::Sender),
            "recipient" => Some(FeePaymentOption::Recipient),
            "shared" => Some(FeePaymentOption::Shared),
            _ => None,
        }
    }
}

/// What gets handed to the transaction gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    /// Human-readable one-liner, e.g. "Checking -> Savings"
    pub summary: String,
}

impl TransactionRequest {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        currency: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            currency: currency.into(),
            summary: summary.into(),
        }
    }
}

/// Confirmation returned for a completed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub summary: String,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl Receipt {
    pub fn for_request(request: &TransactionRequest, submitted_at: DateTime<Utc>) -> Self {
        Self {
            reference: Uuid::new_v4(),
            kind: request.kind,
            amount: request.amount,
            currency: request.currency.clone(),
            summary: request.summary.clone(),
            submitted_at,
            completed_at: Utc::now(),
        }
    }

    /// Short reference shown on success screens, e.g. "TXN-1A2B3C4D"
    pub fn short_reference(&self) -> String {
        let simple = self.reference.simple().to_string().to_uppercase();
        format!("TXN-{}", &simple[..8])
    }
}

/// Lifecycle of a single form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded { receipt: Receipt },
    Failed { reason: String },
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            SubmissionState::Succeeded { receipt } => Some(receipt),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_echoes_request() {
        let request = TransactionRequest::new(
            TransactionKind::Transfer,
            Decimal::new(25000, 2),
            "USD",
            "Checking -> Savings",
        );
        let receipt = Receipt::for_request(&request, Utc::now());

        assert_eq!(receipt.amount, Decimal::new(25000, 2));
        assert_eq!(receipt.kind, TransactionKind::Transfer);
        assert!(receipt.short_reference().starts_with("TXN-"));
        assert_eq!(receipt.short_reference().len(), 12);
    }

    #[test]
    fn test_fee_option_parse() {
        assert_eq!(FeePaymentOption::parse("shared"), Some(FeePaymentOption::Shared));
        assert_eq!(FeePaymentOption::parse("both"), None);
    }

    #[test]
    fn test_submission_state_default_is_idle() {
        let state = SubmissionState::default();
        assert_eq!(state, SubmissionState::Idle);
        assert!(!state.is_pending());
        assert!(state.receipt().is_none());
    }
}
