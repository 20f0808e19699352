//! Schemas for every dashboard form

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::{FieldSpec, Schema};
use crate::domain::{FeePaymentOption, FieldKind, FormData, LoanType};
use crate::services::requirements::RequirementResolver;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-().]{7,20}$").unwrap());
static HAS_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").unwrap());
static HAS_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static ACCOUNT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8,17}$").unwrap());
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());
static PIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

pub const ACCOUNT_TYPES: [&str; 2] = ["personal", "business"];

pub const EMPLOYMENT_STATUSES: [&str; 5] =
    ["employed", "self-employed", "unemployed", "retired", "student"];

pub const MIN_APPLICANT_AGE: u32 = 18;

fn email() -> FieldSpec {
    FieldSpec::new("email")
        .required("Email is required")
        .pattern(&EMAIL_RE, "Please enter a valid email address")
}

fn phone() -> FieldSpec {
    FieldSpec::new("phone")
        .required("Phone number is required")
        .pattern(&PHONE_RE, "Please enter a valid phone number")
}

fn full_name() -> FieldSpec {
    FieldSpec::new("fullName")
        .required("Full name is required")
        .min_length(2, "Name must be at least 2 characters")
}

fn amount(field: &str) -> FieldSpec {
    FieldSpec::new(field)
        .required("Amount is required")
        .positive("Amount must be greater than 0")
}

fn decimal(data: &FormData, field: &str) -> Option<Decimal> {
    data.value(field).and_then(|v| Decimal::from_str(v).ok())
}

/// Whole years between `born` and `today`
fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

pub fn login() -> Schema {
    Schema::new("login").field(email()).field(
        FieldSpec::new("password")
            .required("Password is required")
            .min_length(6, "Password must be at least 6 characters"),
    )
}

pub fn enrollment() -> Schema {
    Schema::new("enrollment")
        .field(
            FieldSpec::new("accountType")
                .required("Please select an account type")
                .one_of(&ACCOUNT_TYPES, "Please select an account type"),
        )
        .field(full_name())
        .field(FieldSpec::new("businessName").min_length(2, "Business name must be at least 2 characters"))
        .field(email())
        .field(phone())
        .field(
            FieldSpec::new("password")
                .required("Password is required")
                .min_length(8, "Password must be at least 8 characters")
                .pattern(&HAS_LETTER_RE, "Password must contain a letter")
                .pattern(&HAS_DIGIT_RE, "Password must contain a number"),
        )
        .field(FieldSpec::new("confirmPassword").required("Please confirm your password"))
        .field(
            FieldSpec::new("agreeToTerms")
                .required("You must agree to the terms and conditions")
                .equals("true", "You must agree to the terms and conditions"),
        )
        .refine("confirmPassword", "Passwords do not match", |d| {
            !d.is_filled("confirmPassword") || d.get("confirmPassword") == d.get("password")
        })
        .refine("businessName", "Business name is required for business accounts", |d| {
            d.value("accountType") != Some("business") || d.is_filled("businessName")
        })
}

/// Loan application, validated step by step with `LoanStep::fields`
pub fn loan_application(loan_types: &[LoanType]) -> Schema {
    let types: Arc<Vec<LoanType>> = Arc::new(loan_types.to_vec());
    let ids: Vec<&str> = loan_types.iter().map(|t| t.id.as_str()).collect();
    let find = |types: &Arc<Vec<LoanType>>, d: &FormData| -> Option<LoanType> {
        let id = d.value("loanType")?;
        types.iter().find(|t| t.id == id).cloned()
    };

    let amount_types = Arc::clone(&types);
    let term_types = Arc::clone(&types);

    Schema::new("loan_application")
        // Personal
        .field(full_name())
        .field(email())
        .field(phone())
        .field(
            FieldSpec::new("dateOfBirth")
                .required("Date of birth is required")
                .pattern(&DATE_RE, "Use the format YYYY-MM-DD"),
        )
        .field(
            FieldSpec::new("address")
                .required("Address is required")
                .min_length(5, "Please enter your full address"),
        )
        .refine(
            "dateOfBirth",
            format!("You must be at least {} years old", MIN_APPLICANT_AGE),
            |d| match d.value("dateOfBirth").map(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d")) {
                Some(Ok(born)) => age_on(born, Utc::now().date_naive()) >= MIN_APPLICANT_AGE as i32,
                // Missing or malformed dates are reported by the field rules
                _ => true,
            },
        )
        // Employment
        .field(
            FieldSpec::new("employmentStatus")
                .required("Employment status is required")
                .one_of(&EMPLOYMENT_STATUSES, "Please select a valid employment status"),
        )
        .field(FieldSpec::new("employerName"))
        .field(
            FieldSpec::new("annualIncome")
                .required("Annual income is required")
                .range(Some(Decimal::ZERO), None, "Annual income must be a positive number"),
        )
        .refine("employerName", "Employer name is required", |d| {
            !matches!(d.value("employmentStatus"), Some("employed") | Some("self-employed"))
                || d.is_filled("employerName")
        })
        // Loan details
        .field(
            FieldSpec::new("loanType")
                .required("Please select a loan type")
                .one_of(ids.as_slice(), "Please select a valid loan type"),
        )
        .field(amount("loanAmount"))
        .field(
            FieldSpec::new("loanTerm")
                .required("Please select a loan term")
                .pattern(&DIGITS_RE, "Please select a valid loan term"),
        )
        .field(
            FieldSpec::new("purpose")
                .required("Please describe the purpose of the loan")
                .min_length(10, "Please provide more detail (at least 10 characters)")
                .max_length(500, "Purpose must be 500 characters or fewer"),
        )
        .field(FieldSpec::new("existingCustomer"))
        .field(FieldSpec::new("accountNumber").pattern(&ACCOUNT_NUMBER_RE, "Account number must be 8-17 digits"))
        .refine("loanAmount", "Amount is outside the limits for this loan type", move |d| {
            match (find(&amount_types, d), decimal(d, "loanAmount")) {
                (Some(loan), Some(amount)) if amount > Decimal::ZERO => loan.allows_amount(amount),
                _ => true,
            }
        })
        .refine("loanTerm", "This term is not offered for the selected loan type", move |d| {
            match (find(&term_types, d), d.value("loanTerm").and_then(|v| v.parse::<u32>().ok())) {
                (Some(loan), Some(term)) => loan.allows_term(term),
                _ => true,
            }
        })
        .refine("accountNumber", "Account number is required for existing customers", |d| {
            !d.is_true("existingCustomer") || d.is_filled("accountNumber")
        })
        // Review
        .field(
            FieldSpec::new("agreeToTerms")
                .required("You must agree to the terms and conditions")
                .equals("true", "You must agree to the terms and conditions"),
        )
}

pub fn transfer() -> Schema {
    Schema::new("transfer")
        .field(FieldSpec::new("fromAccount").required("Please select a source account"))
        .field(FieldSpec::new("toAccount").required("Please select a destination account"))
        .field(amount("amount"))
        .field(FieldSpec::new("description").max_length(140, "Description must be 140 characters or fewer"))
        .refine("toAccount", "Cannot transfer to the same account", |d| {
            !d.is_filled("toAccount") || d.value("toAccount") != d.value("fromAccount")
        })
}

/// International transfer; identifier fields follow the destination country
///
/// Every identifier kind gets two refinements: required when the country
/// uses it, and well-formed when filled. Kinds the country does not use are
/// never checked.
pub fn international_transfer(resolver: &RequirementResolver) -> Schema {
    let requirements: Arc<HashMap<String, Vec<FieldKind>>> = Arc::new(
        resolver
            .countries()
            .iter()
            .map(|c| (c.code.to_uppercase(), c.requirements.clone()))
            .collect(),
    );

    let known = Arc::clone(&requirements);
    let mut schema = Schema::new("international_transfer")
        .field(FieldSpec::new("fromAccount").required("Please select a source account"))
        .field(full_name_as("recipientName"))
        .field(FieldSpec::new("recipientCountry").required("Please select a country"))
        .field(FieldSpec::new("bankName").required("Bank name is required"))
        .field(
            FieldSpec::new("accountNumber")
                .required("Account number is required")
                .min_length(4, "Account number is too short")
                .max_length(34, "Account number is too long"),
        )
        .field(amount("amount"))
        .field(
            FieldSpec::new("currency")
                .required("Please select a currency")
                .pattern(&CURRENCY_RE, "Please select a valid currency"),
        )
        .field(
            FieldSpec::new("feePaymentOption")
                .one_of(&FeePaymentOption::VALUES, "Please choose who pays the transfer fee"),
        )
        .field(
            FieldSpec::new("purpose")
                .required("Please state the purpose of the transfer")
                .max_length(200, "Purpose must be 200 characters or fewer"),
        )
        .refine("recipientCountry", "Transfers to this country are not supported", move |d| {
            match d.value("recipientCountry") {
                Some(code) => known.contains_key(&code.to_uppercase()),
                None => true,
            }
        });

    for kind in FieldKind::ALL {
        let required_in = Arc::clone(&requirements);
        let format_in = Arc::clone(&requirements);
        let applies = move |table: &HashMap<String, Vec<FieldKind>>, d: &FormData| {
            d.value("recipientCountry")
                .and_then(|code| table.get(&code.to_uppercase()))
                .map(|kinds| kinds.contains(&kind))
                .unwrap_or(false)
        };

        schema = schema
            .refine(kind.field_name(), format!("{} is required", kind.label()), move |d| {
                !applies(&required_in, d) || d.is_filled(kind.field_name())
            })
            .refine(kind.field_name(), format!("Invalid {}", kind.label()), move |d| {
                match d.value(kind.field_name()) {
                    Some(value) if applies(&format_in, d) => kind.accepts(value),
                    _ => true,
                }
            });
    }

    schema
}

fn full_name_as(field: &str) -> FieldSpec {
    FieldSpec::new(field)
        .required("Recipient name is required")
        .min_length(2, "Name must be at least 2 characters")
}

/// Swap between units of `units`
pub fn swap(units: &[&str]) -> Schema {
    Schema::new("swap")
        .field(
            FieldSpec::new("fromAsset")
                .required("Please select an asset to swap from")
                .one_of(units, "Unsupported asset"),
        )
        .field(
            FieldSpec::new("toAsset")
                .required("Please select an asset to swap to")
                .one_of(units, "Unsupported asset"),
        )
        .field(amount("amount"))
        .refine("toAsset", "Cannot swap an asset for itself", |d| {
            !d.is_filled("toAsset") || d.value("toAsset") != d.value("fromAsset")
        })
}

pub fn change_pin() -> Schema {
    Schema::new("change_pin")
        .field(FieldSpec::new("currentPin").required("Current PIN is required"))
        .field(
            FieldSpec::new("newPin")
                .required("New PIN is required")
                .pattern(&PIN_RE, "PIN must be exactly 4 digits"),
        )
        .field(FieldSpec::new("confirmPin").required("Please confirm your new PIN"))
        .refine("confirmPin", "PINs do not match", |d| {
            !d.is_filled("confirmPin") || d.value("confirmPin") == d.value("newPin")
        })
        .refine("newPin", "New PIN must be different from the current PIN", |d| {
            !d.is_filled("newPin") || d.value("newPin") != d.value("currentPin")
        })
}
