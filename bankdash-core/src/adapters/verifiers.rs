//! Verifier and code generator adapters
//!
//! The stored-PIN and fixed-code verifiers reproduce the dashboard's mock
//! checks (plaintext PIN, literal 2FA code). PIN hashing with Argon2id is
//! available as an opt-in replacement for the plaintext PIN.

use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use rand::Rng;

use crate::domain::{Argon2Params, PinHash};
use crate::ports::{CodeGenerator, StateStore, Verifier};

/// Checks a PIN against the one held in the state store
pub struct StoredPinVerifier {
    store: Arc<dyn StateStore>,
}

impl StoredPinVerifier {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }
}

impl Verifier for StoredPinVerifier {
    fn name(&self) -> &str {
        "pin"
    }

    fn verify(&self, submitted: &str) -> bool {
        let Ok(state) = self.store.load() else {
            return false;
        };
        match &state.pin_hash {
            Some(hash) => verify_pin_hash(submitted, hash).unwrap_or(false),
            None => submitted == state.user_pin,
        }
    }
}

/// Accepts exactly one literal code
pub struct StaticCodeVerifier {
    name: String,
    code: String,
}

impl StaticCodeVerifier {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Two-factor verifier accepting the configured code
    pub fn two_factor(code: impl Into<String>) -> Self {
        Self::new("two_factor", code)
    }
}

impl Verifier for StaticCodeVerifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn verify(&self, submitted: &str) -> bool {
        submitted.trim() == self.code
    }
}

/// Uniformly random decimal digits
#[derive(Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

/// Always produces the same code
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self, _len: usize) -> String {
        self.code.clone()
    }
}

/// Derive an Argon2id hash from a PIN
fn derive_key(pin: &str, salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let argon2_params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create argon2 params: {:?}", e))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key = vec![0u8; params.hash_len as usize];
    argon2
        .hash_password_into(pin.as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("Failed to hash PIN: {:?}", e))?;

    Ok(key)
}

/// Hash a PIN with a fresh 16-byte salt
pub fn hash_pin(pin: &str, params: Argon2Params) -> Result<PinHash> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let key = derive_key(pin, &salt, &params)?;
    Ok(PinHash::new(
        base64::engine::general_purpose::STANDARD.encode(salt),
        hex::encode(key),
        params,
    ))
}

/// Check a PIN against a stored hash
pub fn verify_pin_hash(pin: &str, stored: &PinHash) -> Result<bool> {
    let salt = base64::engine::general_purpose::STANDARD
        .decode(&stored.salt)
        .context("Invalid salt in PIN hash")?;
    let key = derive_key(pin, &salt, &stored.argon2_params)?;
    Ok(hex::encode(key) == stored.hash)
}
