//! Submission tracker - the idle / submitting / done lifecycle of a form

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::domain::{Receipt, SubmissionState, TransactionRequest};
use crate::ports::TransactionGateway;

/// Tracks one form's submission through a gateway
///
/// Callers validate before submitting, so a form that fails validation
/// never leaves `Idle`. There is no cancellation, retry or timeout.
pub struct Submission {
    gateway: Arc<dyn TransactionGateway>,
    state: Mutex<SubmissionState>,
}

impl Submission {
    pub fn new(gateway: Arc<dyn TransactionGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// Submit `request`, moving Idle -> Submitting -> Succeeded/Failed
    ///
    /// A second call while one is pending is rejected with
    /// `SubmissionInProgress` and leaves the pending one untouched.
    pub async fn submit(&self, request: &TransactionRequest) -> Result<Receipt> {
        {
            let mut state = self.lock();
            if state.is_pending() {
                return Err(Error::SubmissionInProgress);
            }
            *state = SubmissionState::Submitting;
        }

        let outcome = self.gateway.submit(request).await;

        *self.lock() = match &outcome {
            Ok(receipt) => SubmissionState::Succeeded {
                receipt: receipt.clone(),
            },
            Err(e) => SubmissionState::Failed {
                reason: e.to_string(),
            },
        };
        outcome
    }

    /// Return to `Idle` so the form can be used again
    ///
    /// Has no effect while a submission is pending.
    pub fn reset(&self) {
        let mut state = self.lock();
        if !state.is_pending() {
            *state = SubmissionState::Idle;
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
