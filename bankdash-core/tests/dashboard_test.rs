//! End-to-end checks of the dashboard logic through `BankdashContext`
//!
//! Run with: cargo test --test dashboard_test

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tempfile::TempDir;

use bankdash_core::adapters::demo::{international_rates, transfer_rates, EURO_ID};
use bankdash_core::adapters::simulated::SimulatedGateway;
use bankdash_core::adapters::state_store::MemoryStateStore;
use bankdash_core::adapters::verifiers::FixedCodeGenerator;
use bankdash_core::config::Config;
use bankdash_core::domain::{
    AccountMode, ChangePinForm, FieldKind, InternationalTransferForm, LoanStep, LoginForm,
    SubmissionState, TransferForm,
};
use bankdash_core::services::conversion::{convert, round_trip};
use bankdash_core::services::{AuthService, OtpState};
use bankdash_core::{BankdashContext, Error};

fn memory_context(dir: &TempDir) -> BankdashContext {
    BankdashContext::with_parts(
        dir.path(),
        Config::default(),
        Arc::new(MemoryStateStore::new()),
        Arc::new(SimulatedGateway::new(Duration::from_millis(1500))),
    )
}

fn transfer(from: &str, to: &str, amount: &str) -> TransferForm {
    TransferForm {
        from_account: from.to_string(),
        to_account: to.to_string(),
        amount: amount.to_string(),
        description: None,
    }
}

// =========================================================================
// Conversion
// =========================================================================

#[test]
fn test_transfer_rates_are_not_reciprocal() {
    let table = transfer_rates();
    assert_eq!(convert("100", "USD", "EUR", &table), Some(Decimal::new(9200, 2)));
    // 92.00 EUR back at 1.08 does not give back 100 USD
    assert_eq!(round_trip("100", "USD", "EUR", &table), Some(Decimal::new(9936, 2)));
}

#[test]
fn test_screens_disagree_on_the_same_pair() {
    let transfer = convert("100", "USD", "EUR", &transfer_rates());
    let international = convert("100", "USD", "EUR", &international_rates());
    assert!(transfer.is_some() && international.is_some());
    assert_ne!(transfer, international);
}

#[test]
fn test_bad_amounts_give_no_result() {
    for input in ["0", "-5", "abc"] {
        assert_eq!(convert(input, "USD", "EUR", &transfer_rates()), None, "input {:?}", input);
        assert_eq!(convert(input, "USD", "EUR", &international_rates()), None, "input {:?}", input);
    }
}

// =========================================================================
// Country requirements
// =========================================================================

#[test]
fn test_every_country_resolves_to_known_fields() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);

    for country in ctx.resolver.countries() {
        let kinds = ctx.resolver.resolve(&country.code);
        assert!(!kinds.is_empty(), "{} has no requirements", country.code);
        assert!(kinds.iter().all(|k| FieldKind::ALL.contains(k)));
    }
    assert!(ctx.resolver.resolve("ZZ").is_empty());
}

#[test]
fn test_reference_countries_resolve_to_documented_lists() {
    use FieldKind::*;

    let expected: Vec<(&str, Vec<FieldKind>)> = vec![
        ("US", vec![RoutingNumber, SwiftBic]),
        ("GB", vec![SortCode, SwiftBic]),
        ("DE", vec![Iban, SwiftBic]),
        ("FR", vec![Iban, SwiftBic]),
        ("ES", vec![Iban, SwiftBic]),
        ("IT", vec![Iban, SwiftBic]),
        ("NL", vec![Iban, SwiftBic]),
        ("CH", vec![Iban, SwiftBic]),
        ("AU", vec![Bsb, SwiftBic]),
        ("CA", vec![BankCode, BranchCode, SwiftBic]),
        ("IN", vec![Ifsc, SwiftBic]),
        ("MX", vec![Clabe, SwiftBic]),
        ("RU", vec![Bik, SwiftBic]),
        ("BR", vec![CpfCnpj, BankCode, BranchCode, SwiftBic]),
        ("JP", vec![BankCode, BranchCode, SwiftBic]),
        ("ZA", vec![BranchCode, SwiftBic]),
        ("SG", vec![BankCode, SwiftBic]),
        ("NG", vec![BankCode]),
    ];

    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);

    assert_eq!(ctx.resolver.countries().len(), expected.len());
    for (code, kinds) in &expected {
        assert_eq!(&ctx.resolver.resolve(code), kinds, "requirements for {}", code);
    }
}

#[test]
fn test_germany_and_uk_show_different_fields() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);

    let germany = ctx.resolver.find_by_name("Germany").unwrap().code.clone();
    let uk = ctx.resolver.find_by_name("United Kingdom").unwrap().code.clone();

    assert!(ctx.resolver.is_visible(&germany, FieldKind::Iban));
    assert!(ctx.resolver.is_visible(&germany, FieldKind::SwiftBic));
    for hidden in [FieldKind::SortCode, FieldKind::Bsb, FieldKind::RoutingNumber] {
        assert!(!ctx.resolver.is_visible(&germany, hidden), "{:?} shown for Germany", hidden);
    }
    assert!(ctx.resolver.is_visible(&uk, FieldKind::SortCode));
    assert!(!ctx.resolver.is_visible(&uk, FieldKind::Iban));

    let mut form = InternationalTransferForm::default();
    ctx.resolver.select_country(&mut form, &germany);
    form.set_identifier(FieldKind::Iban, "DE89370400440532013000");
    form.set_identifier(FieldKind::SwiftBic, "DEUTDEFF");

    ctx.resolver.select_country(&mut form, &uk);
    assert_eq!(form.recipient_country, "GB");
    assert_eq!(form.identifier(FieldKind::Iban), None);
    assert_eq!(form.identifier(FieldKind::SwiftBic), Some("DEUTDEFF"));
}

// =========================================================================
// Auth
// =========================================================================

#[test]
fn test_default_pin_and_invalid_pin_message() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);

    assert!(ctx.auth_service.verify_pin("1234").is_ok());
    let err = ctx.auth_service.verify_pin("0000").unwrap_err();
    assert!(matches!(err, Error::InvalidPin));
    assert_eq!(err.to_string(), "Invalid PIN");
}

#[test]
fn test_otp_challenge_messages() {
    let auth = AuthService::new(Arc::new(MemoryStateStore::new()), &Config::default())
        .with_code_generator(Box::new(FixedCodeGenerator::new("482913")));
    let mut challenge = auth.start_otp();
    assert_eq!(challenge.digits(), 6);

    assert!(challenge.submit("4829").is_err());
    assert_eq!(challenge.error(), Some("Please enter all 6 digits"));

    assert!(challenge.submit("111111").is_err());
    assert_eq!(challenge.error(), Some("Invalid verification code. Please try again."));
    assert_eq!(challenge.state(), OtpState::Pending);

    challenge.submit("482913").unwrap();
    assert!(challenge.is_verified());
    assert_eq!(challenge.error(), None);
    assert_eq!(challenge.attempts(), 3);
}

#[test]
fn test_state_survives_new_context() {
    let dir = TempDir::new().unwrap();

    {
        let ctx = BankdashContext::new(dir.path()).unwrap();
        ctx.auth_service
            .login(&LoginForm {
                email: "jane@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .unwrap();
        ctx.auth_service.set_mode(AccountMode::Crypto).unwrap();
        ctx.auth_service
            .change_pin(&ChangePinForm {
                current_pin: "1234".to_string(),
                new_pin: "4321".to_string(),
                confirm_pin: "4321".to_string(),
            })
            .unwrap();
    }

    let ctx = BankdashContext::new(dir.path()).unwrap();
    let state = ctx.auth_service.state().unwrap();
    assert!(state.is_logged_in);
    assert_eq!(state.user_email.as_deref(), Some("jane@example.com"));
    assert_eq!(state.account_mode, AccountMode::Crypto);
    assert!(ctx.auth_service.verify_pin("4321").is_ok());
    assert!(ctx.auth_service.verify_pin("1234").is_err());

    ctx.auth_service.reset().unwrap();
    assert!(ctx.auth_service.verify_pin("1234").is_ok());
    assert!(!ctx.auth_service.state().unwrap().is_logged_in);
}

// =========================================================================
// Loan wizard
// =========================================================================

#[test]
fn test_loan_step_one_blocks_until_filled() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);
    let mut app = ctx.loan_service.start_application();

    app.form.full_name = "Jane Doe".to_string();
    app.form.email = "jane@example.com".to_string();
    app.form.phone = "555-123-4567".to_string();
    app.form.address = "1 Main Street".to_string();

    let err = app.advance().unwrap_err();
    assert_eq!(err.validation_errors().unwrap().paths(), vec!["dateOfBirth"]);
    assert_eq!(app.step(), LoanStep::Personal);

    app.form.date_of_birth = "1990-06-15".to_string();
    assert_eq!(app.advance().unwrap(), LoanStep::Employment);
}

// =========================================================================
// Submissions
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_transfer_waits_for_gateway_and_leaves_balances() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);
    let before: Vec<Decimal> = ctx.transfer_service.accounts().iter().map(|a| a.balance).collect();

    let start = tokio::time::Instant::now();
    let receipt = ctx
        .transfer_service
        .submit_domestic(&transfer("Primary Checking", "High-Yield Savings", "250"))
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1500));
    assert_eq!(receipt.amount, Decimal::new(250, 0));
    assert!(matches!(
        ctx.transfer_service.domestic_submission().state(),
        SubmissionState::Succeeded { .. }
    ));

    let after: Vec<Decimal> = ctx.transfer_service.accounts().iter().map(|a| a.balance).collect();
    assert_eq!(before, after);
}

#[tokio::test(start_paused = true)]
async fn test_double_submit_is_rejected() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);
    let form = transfer("Primary Checking", "Business Account", "10");

    let (first, second) = tokio::join!(
        ctx.transfer_service.submit_domestic(&form),
        ctx.transfer_service.submit_domestic(&form),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::SubmissionInProgress)));
}

#[tokio::test(start_paused = true)]
async fn test_failing_gateway_reports_failure() {
    let dir = TempDir::new().unwrap();
    let ctx = BankdashContext::with_parts(
        dir.path(),
        Config::default(),
        Arc::new(MemoryStateStore::new()),
        Arc::new(SimulatedGateway::failing(Duration::from_millis(100), "network unavailable")),
    );

    let err = ctx
        .transfer_service
        .submit_domestic(&transfer("Primary Checking", EURO_ID.to_string().as_str(), "100"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TransactionFailed(ref r) if r == "network unavailable"));
    assert!(matches!(
        ctx.transfer_service.domestic_submission().state(),
        SubmissionState::Failed { .. }
    ));
}

#[test]
fn test_invalid_transfer_never_reaches_gateway() {
    let dir = TempDir::new().unwrap();
    let ctx = memory_context(&dir);

    let err = ctx
        .transfer_service
        .quote_domestic(&transfer("Primary Checking", "High-Yield Savings", "-5"))
        .unwrap_err();
    assert!(err.validation_errors().unwrap().has("amount"));
    assert_eq!(ctx.transfer_service.domestic_submission().state(), SubmissionState::Idle);
}
