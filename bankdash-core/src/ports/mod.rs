//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod gateway;
mod state_store;
mod verifier;

pub use gateway::TransactionGateway;
pub use state_store::StateStore;
pub use verifier::{CodeGenerator, Verifier};
