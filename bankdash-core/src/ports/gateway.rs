//! Transaction gateway port
//!
//! Stands where a payment backend would be. The only implementation is
//! simulated; see `adapters::simulated`.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{Receipt, TransactionRequest};

#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Gateway name (e.g., "simulated")
    fn name(&self) -> &str;

    /// Submit a validated request
    ///
    /// Returns a receipt on success or `Error::TransactionFailed`.
    async fn submit(&self, request: &TransactionRequest) -> Result<Receipt>;
}
