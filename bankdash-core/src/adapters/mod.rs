//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON file and in-memory stores for the StateStore port
//! - Stored-PIN, literal-code and Argon2id verifiers for the Verifier port
//! - A fixed-delay simulated TransactionGateway
//! - Hardcoded demo reference data (accounts, rates, countries, loans)

pub mod demo;
pub mod simulated;
pub mod state_store;
pub mod verifiers;
