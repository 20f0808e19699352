//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": {
//!     "simulatedDelayMs": 1500,
//!     "twoFactorCode": "123456",
//!     "otpLength": 6,
//!     "hashPins": false
//!   }
//! }
//! ```
//! Keys the dashboard does not manage are kept untouched on save.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

/// Environment override for the simulated submission delay
pub const DELAY_ENV: &str = "BANKDASH_DELAY_MS";

pub const DEFAULT_DELAY_MS: u64 = 1500;
pub const DEFAULT_TWO_FACTOR_CODE: &str = "123456";
pub const DEFAULT_OTP_LENGTH: usize = 6;
pub const OTP_LENGTH_RANGE: RangeInclusive<usize> = 4..=10;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulated_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    two_factor_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    otp_length: Option<usize>,
    #[serde(default)]
    hash_pins: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Bankdash configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub simulated_delay: Duration,
    pub two_factor_code: String,
    pub otp_length: usize,
    pub hash_pins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulated_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            two_factor_code: DEFAULT_TWO_FACTOR_CODE.to_string(),
            otp_length: DEFAULT_OTP_LENGTH,
            hash_pins: false,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file gives defaults. The delay can
    /// be overridden with `BANKDASH_DELAY_MS` (tests and CI use 0).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::load_saved(data_dir)?;
        if let Some(ms) = std::env::var(DELAY_ENV).ok().and_then(|v| v.trim().parse().ok()) {
            config.simulated_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Load only what `settings.json` holds, without environment overrides
    ///
    /// Use this before `save` so an override never gets written back.
    pub fn load_saved(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(&data_dir.join(SETTINGS_FILE))?;
        let delay_ms = raw.app.simulated_delay_ms.unwrap_or(DEFAULT_DELAY_MS);

        let two_factor_code = raw
            .app
            .two_factor_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TWO_FACTOR_CODE.to_string());

        let otp_length = raw
            .app
            .otp_length
            .filter(|len| OTP_LENGTH_RANGE.contains(len))
            .unwrap_or(DEFAULT_OTP_LENGTH);

        Ok(Self {
            simulated_delay: Duration::from_millis(delay_ms),
            two_factor_code,
            otp_length,
            hash_pins: raw.app.hash_pins,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that bankdash doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let settings_path = data_dir.join(SETTINGS_FILE);
        let mut settings = read_settings(&settings_path)?;

        settings.app.simulated_delay_ms = Some(self.simulated_delay.as_millis() as u64);
        settings.app.two_factor_code = Some(self.two_factor_code.clone());
        settings.app.otp_length = Some(self.otp_length);
        settings.app.hash_pins = self.hash_pins;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}
