//! Simulated transaction gateway
//!
//! Stands in for a payment backend: waits a fixed delay and then returns
//! whatever outcome it was built with. The dashboard default always
//! succeeds; a real payment system could fail at this point, so the failing
//! outcome exists to exercise that path in tests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::{Receipt, TransactionRequest};
use crate::ports::TransactionGateway;

/// Default delay before a simulated submission completes
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Result the simulated gateway hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    AlwaysSucceed,
    Fail(String),
}

pub struct SimulatedGateway {
    delay: Duration,
    outcome: SimulatedOutcome,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl SimulatedGateway {
    /// Gateway that succeeds after `delay`
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outcome: SimulatedOutcome::AlwaysSucceed,
        }
    }

    /// Gateway that fails after `delay` with `reason`
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            outcome: SimulatedOutcome::Fail(reason.into()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl TransactionGateway for SimulatedGateway {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn submit(&self, request: &TransactionRequest) -> Result<Receipt> {
        let submitted_at = Utc::now();
        tokio::time::sleep(self.delay).await;

        match &self.outcome {
            SimulatedOutcome::AlwaysSucceed => Ok(Receipt::for_request(request, submitted_at)),
            SimulatedOutcome::Fail(reason) => Err(Error::TransactionFailed(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use rust_decimal::Decimal;

    fn request() -> TransactionRequest {
        TransactionRequest::new(TransactionKind::Swap, Decimal::new(1, 0), "BTC", "BTC -> ETH")
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_delay() {
        let gateway = SimulatedGateway::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();

        let receipt = gateway.submit(&request()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(receipt.currency, "BTC");
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_failure() {
        let gateway = SimulatedGateway::failing(Duration::from_millis(10), "insufficient funds");
        let err = gateway.submit(&request()).await.unwrap_err();
        assert!(matches!(err, Error::TransactionFailed(ref r) if r == "insufficient funds"));
    }
}
