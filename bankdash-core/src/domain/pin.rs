//! PIN hashing metadata

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
///
/// Lighter than a database key derivation: a PIN check runs on every
/// protected action.
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_MEMORY_COST: u32 = 19456; // 19 MiB
pub const DEFAULT_PARALLELISM: u32 = 1;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters for PIN hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Hashed PIN stored in place of the plaintext value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinHash {
    /// Base64-encoded random salt
    pub salt: String,
    /// Hex-encoded derived hash
    pub hash: String,
    pub algorithm: String,
    pub argon2_params: Argon2Params,
}

impl PinHash {
    pub fn new(salt: String, hash: String, argon2_params: Argon2Params) -> Self {
        Self {
            salt,
            hash,
            algorithm: "argon2id".to_string(),
            argon2_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_hash_defaults() {
        let hash = PinHash::new("c2FsdA==".to_string(), "ab".to_string(), Argon2Params::default());
        assert_eq!(hash.algorithm, "argon2id");
        assert_eq!(hash.argon2_params.hash_len, 32);
    }
}
