//! Crypto wallet models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Placeholder written where a real wallet would export key material
pub const PLACEHOLDER_PRIVATE_KEY: &str = "demo-wallet-no-private-key";
pub const PLACEHOLDER_MNEMONIC: &str = "demo wallet backup contains no recovery phrase";

/// A crypto asset held in the user's wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub balance: Decimal,
    pub address: String,
    /// Display value of the whole balance in USD
    pub usd_value: Decimal,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        balance: Decimal,
        address: impl Into<String>,
        usd_value: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            balance,
            address: address.into(),
            usd_value,
        }
    }

    /// Address shortened for display: first six and last four characters
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= 12 {
            return self.address.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Wallet backup file contents
///
/// The key fields are fixed placeholder text: the dashboard holds no real
/// key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBackup {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub assets: Vec<Asset>,
    pub private_key: String,
    pub mnemonic: String,
    /// Hex SHA-256 of the serialized asset list
    pub checksum: String,
}

impl WalletBackup {
    pub fn new(assets: Vec<Asset>) -> serde_json::Result<Self> {
        let checksum = Self::compute_checksum(&assets)?;
        Ok(Self {
            version: 1,
            created_at: Utc::now(),
            assets,
            private_key: PLACEHOLDER_PRIVATE_KEY.to_string(),
            mnemonic: PLACEHOLDER_MNEMONIC.to_string(),
            checksum,
        })
    }

    pub fn compute_checksum(assets: &[Asset]) -> serde_json::Result<String> {
        let payload = serde_json::to_vec(assets)?;
        let mut hasher = Sha256::new();
        hasher.update(&payload);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Whether the checksum still matches the asset list
    pub fn verify(&self) -> bool {
        Self::compute_checksum(&self.assets)
            .map(|c| c == self.checksum)
            .unwrap_or(false)
    }
}
