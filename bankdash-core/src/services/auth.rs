//! Auth service - login flags, PIN, one-time codes and two-factor checks
//!
//! Every check is a local comparison through an injected `Verifier`; there
//! is no identity provider behind it.

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::verifiers::{
    hash_pin, RandomCodeGenerator, StaticCodeVerifier, StoredPinVerifier,
};
use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{AccountMode, AppState, Argon2Params, ChangePinForm, FormData, LoginForm};
use crate::ports::{CodeGenerator, StateStore, Verifier};
use crate::services::validation::schemas;

/// Auth service for the dashboard's mock security checks
pub struct AuthService {
    store: Arc<dyn StateStore>,
    pin_verifier: Box<dyn Verifier>,
    two_factor: Box<dyn Verifier>,
    codes: Box<dyn CodeGenerator>,
    otp_length: usize,
    pin_hashing: Option<Argon2Params>,
}

impl AuthService {
    /// Service with the default verifiers for `config`
    pub fn new(store: Arc<dyn StateStore>, config: &Config) -> Self {
        Self {
            pin_verifier: Box::new(StoredPinVerifier::new(Arc::clone(&store))),
            two_factor: Box::new(StaticCodeVerifier::two_factor(config.two_factor_code.clone())),
            codes: Box::new(RandomCodeGenerator),
            otp_length: config.otp_length,
            pin_hashing: config.hash_pins.then(Argon2Params::default),
            store,
        }
    }

    pub fn with_pin_verifier(mut self, verifier: Box<dyn Verifier>) -> Self {
        self.pin_verifier = verifier;
        self
    }

    pub fn with_two_factor(mut self, verifier: Box<dyn Verifier>) -> Self {
        self.two_factor = verifier;
        self
    }

    pub fn with_code_generator(mut self, codes: Box<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    /// Store new PINs as Argon2id hashes with `params`
    pub fn with_pin_hashing(mut self, params: Argon2Params) -> Self {
        self.pin_hashing = Some(params);
        self
    }

    pub fn state(&self) -> Result<AppState> {
        self.store.load()
    }

    /// Validate credentials and mark the session logged in
    ///
    /// Any well-formed email and password is accepted.
    pub fn login(&self, form: &LoginForm) -> Result<AppState> {
        schemas::login().validate(&FormData::from_form(form)?)?;
        let email = form.email.trim().to_string();
        self.store.update(&mut |state: &mut AppState| state.log_in(email.clone()))
    }

    pub fn logout(&self) -> Result<AppState> {
        self.store.update(&mut |state: &mut AppState| state.log_out())
    }

    pub fn set_mode(&self, mode: AccountMode) -> Result<AppState> {
        self.store.update(&mut |state: &mut AppState| state.account_mode = mode)
    }

    /// Restore every flag to its default, including the PIN
    pub fn reset(&self) -> Result<AppState> {
        let state = AppState::default();
        self.store.save(&state)?;
        Ok(state)
    }

    pub fn verify_pin(&self, pin: &str) -> Result<()> {
        if self.pin_verifier.verify(pin) {
            Ok(())
        } else {
            Err(Error::InvalidPin)
        }
    }

    /// Replace the PIN after checking the current one
    pub fn change_pin(&self, form: &ChangePinForm) -> Result<()> {
        schemas::change_pin().validate(&FormData::from_form(form)?)?;
        self.verify_pin(form.current_pin.trim())?;

        let new_pin = form.new_pin.trim();
        let hashed = match &self.pin_hashing {
            Some(params) => Some(
                hash_pin(new_pin, params.clone()).map_err(|e| Error::Other(e.to_string()))?,
            ),
            None => None,
        };

        self.store.update(&mut |state: &mut AppState| match &hashed {
            Some(hash) => {
                state.pin_hash = Some(hash.clone());
                state.user_pin = String::new();
            }
            None => {
                state.pin_hash = None;
                state.user_pin = new_pin.to_string();
            }
        })?;
        Ok(())
    }

    pub fn verify_two_factor(&self, code: &str) -> Result<()> {
        if self.two_factor.verify(code) {
            Ok(())
        } else {
            Err(Error::InvalidCode)
        }
    }

    /// Issue a fresh one-time code
    pub fn start_otp(&self) -> OtpChallenge {
        OtpChallenge::new(self.codes.generate(self.otp_length))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpState {
    Pending,
    Verified,
}

/// One issued code and the outcome of the attempts against it
///
/// A mismatch leaves the challenge pending with an error message; the same
/// challenge can be retried any number of times.
pub struct OtpChallenge {
    verifier: StaticCodeVerifier,
    code: String,
    state: OtpState,
    error: Option<String>,
    attempts: u32,
}

impl OtpChallenge {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            verifier: StaticCodeVerifier::new("otp", code.clone()),
            code,
            state: OtpState::Pending,
            error: None,
            attempts: 0,
        }
    }

    /// The issued code; the demo shows it in place of sending it
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of digits expected
    pub fn digits(&self) -> usize {
        self.code.len()
    }

    pub fn state(&self) -> OtpState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == OtpState::Verified
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn submit(&mut self, input: &str) -> Result<()> {
        if self.is_verified() {
            return Ok(());
        }
        self.attempts += 1;

        let input = input.trim();
        if input.len() != self.code.len() || !input.chars().all(|c| c.is_ascii_digit()) {
            self.error = Some(format!("Please enter all {} digits", self.code.len()));
            return Err(Error::InvalidCode);
        }

        if self.verifier.verify(input) {
            self.state = OtpState::Verified;
            self.error = None;
            Ok(())
        } else {
            self.error = Some("Invalid verification code. Please try again.".to_string());
            Err(Error::InvalidCode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::state_store::MemoryStateStore;
    use crate::adapters::verifiers::FixedCodeGenerator;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStateStore::new()), &Config::default())
    }

    fn fast_params() -> Argon2Params {
        Argon2Params {
            time_cost: 1,
            memory_cost: 1024,
            parallelism: 1,
            hash_len: 32,
        }
    }

    fn change(current: &str, new: &str, confirm: &str) -> ChangePinForm {
        ChangePinForm {
            current_pin: current.to_string(),
            new_pin: new.to_string(),
            confirm_pin: confirm.to_string(),
        }
    }

    #[test]
    fn test_login_sets_flags() {
        let auth = service();
        let form = LoginForm {
            email: " jane@example.com ".to_string(),
            password: "hunter22".to_string(),
        };
        let state = auth.login(&form).unwrap();
        assert!(state.is_logged_in);
        assert_eq!(state.user_email.as_deref(), Some("jane@example.com"));

        let state = auth.logout().unwrap();
        assert!(!state.is_logged_in);
        assert!(state.user_email.is_none());
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let auth = service();
        let form = LoginForm {
            email: "jane".to_string(),
            password: "hunter22".to_string(),
        };
        let err = auth.login(&form).unwrap_err();
        assert!(err.validation_errors().unwrap().has("email"));
        assert!(!auth.state().unwrap().is_logged_in);
    }

    #[test]
    fn test_default_pin() {
        let auth = service();
        assert!(auth.verify_pin("1234").is_ok());
        let err = auth.verify_pin("4321").unwrap_err();
        assert_eq!(err.to_string(), "Invalid PIN");
    }

    #[test]
    fn test_change_pin_requires_current() {
        let auth = service();
        let err = auth.change_pin(&change("0000", "5678", "5678")).unwrap_err();
        assert!(matches!(err, Error::InvalidPin));

        auth.change_pin(&change("1234", "5678", "5678")).unwrap();
        assert!(auth.verify_pin("5678").is_ok());
        assert!(auth.verify_pin("1234").is_err());
    }

    #[test]
    fn test_change_pin_with_hashing() {
        let auth = service().with_pin_hashing(fast_params());
        auth.change_pin(&change("1234", "2468", "2468")).unwrap();

        let state = auth.state().unwrap();
        assert!(state.user_pin.is_empty());
        assert!(state.pin_hash.is_some());
        assert!(auth.verify_pin("2468").is_ok());
        assert!(auth.verify_pin("1234").is_err());
    }

    #[test]
    fn test_two_factor_uses_configured_code() {
        let auth = service();
        assert!(auth.verify_two_factor("123456").is_ok());
        assert!(matches!(auth.verify_two_factor("000000"), Err(Error::InvalidCode)));

        let auth = service().with_two_factor(Box::new(StaticCodeVerifier::two_factor("999999")));
        assert!(auth.verify_two_factor("999999").is_ok());
    }

    #[test]
    fn test_otp_challenge() {
        let auth = service().with_code_generator(Box::new(FixedCodeGenerator::new("482913")));
        let mut otp = auth.start_otp();
        assert_eq!(otp.code(), "482913");

        assert!(otp.submit("111111").is_err());
        assert_eq!(otp.state(), OtpState::Pending);
        assert!(otp.error().is_some());

        assert!(otp.submit("48291").is_err());
        assert_eq!(otp.error(), Some("Please enter all 6 digits"));

        otp.submit("482913").unwrap();
        assert!(otp.is_verified());
        assert!(otp.error().is_none());
        assert_eq!(otp.attempts(), 3);
    }

    #[test]
    fn test_random_otp_has_configured_length() {
        let auth = service();
        assert_eq!(auth.start_otp().digits(), 6);
    }
}
