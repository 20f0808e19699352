//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on one dashboard screen or concern.

mod auth;
pub mod conversion;
pub mod loan;
pub mod logging;
pub mod requirements;
mod submission;
mod swap;
mod transfer;
pub mod validation;
mod wallet;

pub use auth::{AuthService, OtpChallenge, OtpState};
pub use conversion::{convert, quote, ConversionQuote};
pub use loan::{estimate_payment, LoanApplication, LoanService, PaymentEstimate};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use requirements::RequirementResolver;
pub use submission::Submission;
pub use swap::SwapService;
pub use transfer::{
    international_fee_usd, DomesticQuote, InternationalQuote, TransferService,
};
pub use validation::{FieldSpec, Rule, Schema};
pub use wallet::{WalletBackupFile, WalletService};
