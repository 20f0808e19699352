//! Verification ports
//!
//! PIN, one-time-code and two-factor checks are strategies injected into
//! the auth service, so tests can supply their own fixtures.

/// Checks a submitted secret (PIN, OTP, 2FA code)
pub trait Verifier: Send + Sync {
    /// Verifier name used in log events (e.g., "pin", "two_factor")
    fn name(&self) -> &str;

    /// Whether the submitted value is accepted
    fn verify(&self, submitted: &str) -> bool;
}

/// Produces numeric one-time codes
pub trait CodeGenerator: Send + Sync {
    /// Generate a code of exactly `len` decimal digits
    fn generate(&self, len: usize) -> String;
}
