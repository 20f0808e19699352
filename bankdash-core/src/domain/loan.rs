//! Loan product and application-step models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan product offered on the loans page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanType {
    /// Form value, e.g. "personal"
    pub id: String,
    pub name: String,
    /// Annual percentage rate, e.g. 8.5 for 8.5%
    pub apr: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    /// Allowed terms in months
    pub terms: Vec<u32>,
}

impl LoanType {
    pub fn allows_term(&self, months: u32) -> bool {
        self.terms.contains(&months)
    }

    pub fn allows_amount(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

/// Steps of the loan application wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStep {
    Personal,
    Employment,
    LoanDetails,
    Review,
}

impl LoanStep {
    pub const ALL: [LoanStep; 4] = [
        LoanStep::Personal,
        LoanStep::Employment,
        LoanStep::LoanDetails,
        LoanStep::Review,
    ];

    /// 1-based position shown as "Step n of 4"
    pub fn number(&self) -> usize {
        match self {
            LoanStep::Personal => 1,
            LoanStep::Employment => 2,
            LoanStep::LoanDetails => 3,
            LoanStep::Review => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LoanStep::Personal => "Personal Information",
            LoanStep::Employment => "Employment Details",
            LoanStep::LoanDetails => "Loan Details",
            LoanStep::Review => "Review & Submit",
        }
    }

    /// Form fields owned by this step
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            LoanStep::Personal => &["fullName", "email", "phone", "dateOfBirth", "address"],
            LoanStep::Employment => &["employmentStatus", "employerName", "annualIncome"],
            LoanStep::LoanDetails => &[
                "loanType",
                "loanAmount",
                "loanTerm",
                "purpose",
                "existingCustomer",
                "accountNumber",
            ],
            LoanStep::Review => &["agreeToTerms"],
        }
    }

    pub fn next(&self) -> Option<LoanStep> {
        match self {
            LoanStep::Personal => Some(LoanStep::Employment),
            LoanStep::Employment => Some(LoanStep::LoanDetails),
            LoanStep::LoanDetails => Some(LoanStep::Review),
            LoanStep::Review => None,
        }
    }

    pub fn previous(&self) -> Option<LoanStep> {
        match self {
            LoanStep::Personal => None,
            LoanStep::Employment => Some(LoanStep::Personal),
            LoanStep::LoanDetails => Some(LoanStep::Employment),
            LoanStep::Review => Some(LoanStep::LoanDetails),
        }
    }
}
