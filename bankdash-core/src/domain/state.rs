//! Application state persisted between sessions
//!
//! Holds the handful of demo flags the dashboard keeps across runs. The key
//! names match the flags the web dashboard stored in browser local storage.

use serde::{Deserialize, Serialize};

use super::pin::PinHash;

/// PIN every fresh install starts with
pub const DEFAULT_PIN: &str = "1234";

/// Which half of the dashboard is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountMode {
    #[default]
    Banking,
    Crypto,
}

impl AccountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountMode::Banking => "banking",
            AccountMode::Crypto => "crypto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "banking" | "bank" => Some(AccountMode::Banking),
            "crypto" => Some(AccountMode::Crypto),
            _ => None,
        }
    }
}

/// Persisted application state
///
/// `user_pin` is plaintext, mirroring the mock dashboard. When `pin_hash`
/// is present it takes precedence and `user_pin` is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(rename = "accountMode", default)]
    pub account_mode: AccountMode,
    #[serde(rename = "userPIN", default = "default_pin")]
    pub user_pin: String,
    #[serde(rename = "pinHash", default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<PinHash>,
    #[serde(rename = "isLoggedIn", default)]
    pub is_logged_in: bool,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

fn default_pin() -> String {
    DEFAULT_PIN.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            account_mode: AccountMode::default(),
            user_pin: default_pin(),
            pin_hash: None,
            is_logged_in: false,
            user_email: None,
        }
    }
}

impl AppState {
    pub fn log_in(&mut self, email: impl Into<String>) {
        self.is_logged_in = true;
        self.user_email = Some(email.into());
    }

    pub fn log_out(&mut self) {
        self.is_logged_in = false;
        self.user_email = None;
    }
}
