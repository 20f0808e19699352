//! Loan service - products, payment estimates and the application wizard

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{
    FormData, LoanApplicationForm, LoanStep, LoanType, Receipt, TransactionKind,
    TransactionRequest,
};
use crate::ports::TransactionGateway;
use crate::services::submission::Submission;
use crate::services::validation::{schemas, Schema};

/// Monthly repayment figures for a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentEstimate {
    pub principal: Decimal,
    pub apr: Decimal,
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub total_payment: Decimal,
    pub total_interest: Decimal,
}

/// Standard amortized monthly payment, rounded to cents
///
/// `apr` is a percentage (6.5 for 6.5%). A zero rate divides the principal
/// evenly. Returns `None` for a non-positive principal or a zero term.
pub fn estimate_payment(principal: Decimal, apr: Decimal, term_months: u32) -> Option<PaymentEstimate> {
    if principal <= Decimal::ZERO || term_months == 0 || apr < Decimal::ZERO {
        return None;
    }

    let months = Decimal::from(term_months);
    let monthly_rate = apr / Decimal::ONE_HUNDRED / Decimal::from(12);

    let raw = if monthly_rate.is_zero() {
        principal / months
    } else {
        let mut growth = Decimal::ONE;
        let factor = Decimal::ONE + monthly_rate;
        for _ in 0..term_months {
            growth = growth.checked_mul(factor)?;
        }
        principal.checked_mul(monthly_rate)?.checked_mul(growth)? / (growth - Decimal::ONE)
    };

    let monthly_payment = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total_payment = monthly_payment * months;
    Some(PaymentEstimate {
        principal,
        apr,
        term_months,
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

pub struct LoanService {
    loan_types: Vec<LoanType>,
    gateway: Arc<dyn TransactionGateway>,
}

impl LoanService {
    pub fn new(loan_types: Vec<LoanType>, gateway: Arc<dyn TransactionGateway>) -> Self {
        Self { loan_types, gateway }
    }

    pub fn loan_types(&self) -> &[LoanType] {
        &self.loan_types
    }

    pub fn find(&self, id: &str) -> Option<&LoanType> {
        let id = id.trim();
        self.loan_types
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }

    /// Estimate payments for a product, checking its limits
    pub fn estimate(&self, loan_type: &str, amount: &str, term_months: u32) -> Result<PaymentEstimate> {
        let loan = self
            .find(loan_type)
            .ok_or_else(|| Error::not_found(format!("Loan type {}", loan_type)))?;
        let principal = Decimal::from_str(amount.trim())
            .map_err(|_| Error::Other(format!("Invalid amount: {}", amount)))?;

        if !loan.allows_amount(principal) {
            return Err(Error::Other(format!(
                "{} amounts range from {} to {}",
                loan.name, loan.min_amount, loan.max_amount
            )));
        }
        if !loan.allows_term(term_months) {
            return Err(Error::Other(format!(
                "{} is not offered over {} months",
                loan.name, term_months
            )));
        }

        estimate_payment(principal, loan.apr, term_months)
            .ok_or_else(|| Error::Other("Could not compute an estimate".to_string()))
    }

    pub fn start_application(&self) -> LoanApplication {
        LoanApplication::new(&self.loan_types, Arc::clone(&self.gateway))
    }
}

/// Multi-step loan application
///
/// `advance` checks only the fields of the current step. `submit` checks the
/// whole form again and, on failure, moves back to the first step with an
/// error.
pub struct LoanApplication {
    pub form: LoanApplicationForm,
    step: LoanStep,
    schema: Schema,
    submission: Submission,
}

impl LoanApplication {
    pub fn new(loan_types: &[LoanType], gateway: Arc<dyn TransactionGateway>) -> Self {
        Self {
            form: LoanApplicationForm::default(),
            step: LoanStep::Personal,
            schema: schemas::loan_application(loan_types),
            submission: Submission::new(gateway),
        }
    }

    pub fn step(&self) -> LoanStep {
        self.step
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Progress as (current step number, total steps)
    pub fn progress(&self) -> (usize, usize) {
        (self.step.number(), LoanStep::ALL.len())
    }

    /// Validate the current step without moving
    pub fn check_step(&self) -> Result<()> {
        let data = FormData::from_form(&self.form)?;
        self.schema.validate_fields(&data, self.step.fields())?;
        Ok(())
    }

    /// Move to the next step if the current one is valid
    ///
    /// On the last step this only validates and stays put.
    pub fn advance(&mut self) -> Result<LoanStep> {
        self.check_step()?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move to the previous step; entered values are kept
    pub fn back(&mut self) -> LoanStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Validate the full application and submit it
    pub async fn submit(&mut self) -> Result<Receipt> {
        let data = FormData::from_form(&self.form)?;
        if let Err(errors) = self.schema.validate(&data) {
            if let Some(step) = LoanStep::ALL
                .into_iter()
                .find(|s| s.fields().iter().any(|f| errors.has(*f)))
            {
                self.step = step;
            }
            return Err(errors.into());
        }

        let amount = Decimal::from_str(self.form.loan_amount.trim())
            .map_err(|_| Error::Other("Invalid loan amount".to_string()))?;
        let request = TransactionRequest::new(
            TransactionKind::LoanApplication,
            amount,
            "USD",
            format!("{} loan, {} months", self.form.loan_type, self.form.loan_term.trim()),
        );
        self.submission.submit(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::adapters::demo::demo_loan_types;
    use crate::adapters::simulated::SimulatedGateway;

    fn service() -> LoanService {
        LoanService::new(
            demo_loan_types(),
            Arc::new(SimulatedGateway::new(Duration::from_millis(1500))),
        )
    }

    fn fill_personal(app: &mut LoanApplication) {
        app.form.full_name = "Jane Doe".to_string();
        app.form.email = "jane@example.com".to_string();
        app.form.phone = "555-123-4567".to_string();
        app.form.date_of_birth = "1988-02-29".to_string();
        app.form.address = "1 Main Street".to_string();
    }

    fn fill_rest(app: &mut LoanApplication) {
        app.form.employment_status = "employed".to_string();
        app.form.employer_name = Some("Acme".to_string());
        app.form.annual_income = "72000".to_string();
        app.form.loan_type = "personal".to_string();
        app.form.loan_amount = "15000".to_string();
        app.form.loan_term = "36".to_string();
        app.form.purpose = "Consolidate credit card debt".to_string();
        app.form.agree_to_terms = true;
    }

    #[test]
    fn test_estimate_amortized() {
        // 10,000 at 6% over 12 months
        let estimate = estimate_payment(Decimal::new(10000, 0), Decimal::new(6, 0), 12).unwrap();
        assert_eq!(estimate.monthly_payment, Decimal::new(86066, 2));
        assert_eq!(estimate.total_payment, Decimal::new(1032792, 2));
    }

    #[test]
    fn test_estimate_zero_rate() {
        let estimate = estimate_payment(Decimal::new(1200, 0), Decimal::ZERO, 12).unwrap();
        assert_eq!(estimate.monthly_payment, Decimal::new(100, 0));
        assert_eq!(estimate.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_estimate_rejects_bad_input() {
        assert!(estimate_payment(Decimal::ZERO, Decimal::new(5, 0), 12).is_none());
        assert!(estimate_payment(Decimal::new(100, 0), Decimal::new(5, 0), 0).is_none());
    }

    #[test]
    fn test_estimate_checks_product_limits() {
        let loans = service();
        assert!(loans.estimate("auto", "20000", 48).is_ok());
        assert!(loans.estimate("auto", "1000", 48).is_err());
        assert!(loans.estimate("auto", "20000", 12).is_err());
        assert!(matches!(loans.estimate("yacht", "20000", 12), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_step_one_blocks_on_empty_field() {
        let mut app = service().start_application();
        fill_personal(&mut app);
        app.form.email = String::new();

        let err = app.advance().unwrap_err();
        assert_eq!(err.validation_errors().unwrap().paths(), vec!["email"]);
        assert_eq!(app.step(), LoanStep::Personal);

        app.form.email = "jane@example.com".to_string();
        assert_eq!(app.advance().unwrap(), LoanStep::Employment);
        assert_eq!(app.progress(), (2, 4));
    }

    #[test]
    fn test_back_keeps_values() {
        let mut app = service().start_application();
        fill_personal(&mut app);
        app.advance().unwrap();
        assert_eq!(app.back(), LoanStep::Personal);
        assert_eq!(app.back(), LoanStep::Personal);
        assert_eq!(app.form.full_name, "Jane Doe");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_revalidates_everything() {
        let mut app = service().start_application();
        fill_personal(&mut app);
        fill_rest(&mut app);
        for _ in 0..3 {
            app.advance().unwrap();
        }
        assert_eq!(app.step(), LoanStep::Review);

        app.form.phone = String::new();
        assert!(app.submit().await.is_err());
        assert_eq!(app.step(), LoanStep::Personal);

        app.form.phone = "555-123-4567".to_string();
        let receipt = app.submit().await.unwrap();
        assert_eq!(receipt.kind, TransactionKind::LoanApplication);
        assert_eq!(receipt.amount, Decimal::new(15000, 0));
    }
}
