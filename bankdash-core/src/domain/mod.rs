//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation helpers - no I/O or external dependencies.

mod account;
mod asset;
pub mod country;
pub mod form;
mod loan;
mod pin;
pub mod rates;
pub mod result;
mod state;
mod transaction;

pub use account::{mask_account_number, Account, AccountKind, Beneficiary};
pub use asset::{Asset, WalletBackup, PLACEHOLDER_MNEMONIC, PLACEHOLDER_PRIVATE_KEY};
pub use country::{Bank, CountryProfile, FieldKind};
pub use form::{
    ChangePinForm, EnrollmentForm, FieldError, FormData, InternationalTransferForm,
    LoanApplicationForm, LoginForm, SwapForm, TransferForm, ValidationErrors,
};
pub use loan::{LoanStep, LoanType};
pub use pin::{Argon2Params, PinHash};
pub use rates::{ExchangeRateTable, RateQuote, RateSource, UnitKind};
pub use state::{AccountMode, AppState, DEFAULT_PIN};
pub use transaction::{
    FeePaymentOption, Receipt, SubmissionState, TransactionKind, TransactionRequest,
};
