//! Mock pairing provider for testing.
//!
//! Returns scripted raw outputs in order, records every request for
//! verification, and can inject transport errors. Lets the validator and
//! service be exercised without a real model.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{PairingProvider, PairingRequest, ProviderError, RefinementRequest};

/// A recorded call, kept for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Generate(PairingRequest),
    Refine(RefinementRequest),
}

/// Scripted provider: queued outputs are consumed in order across both
/// operations. When the queue is empty the last scripted output repeats,
/// which keeps structurally-idempotent refinement tests simple.
#[derive(Debug, Clone, Default)]
pub struct MockPairingProvider {
    outputs: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    last: Arc<Mutex<Option<Result<String, ProviderError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockPairingProvider {
    /// Creates an empty mock. A call against an unscripted mock returns an
    /// Unavailable error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw model output.
    pub fn with_output(self, raw: impl Into<String>) -> Self {
        self.outputs.lock().unwrap().push_back(Ok(raw.into()));
        self
    }

    /// Queues a transport error.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.outputs.lock().unwrap().push_back(Err(error));
        self
    }

    /// All calls made against this mock, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made against this mock.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_output(&self) -> Result<String, ProviderError> {
        let mut outputs = self.outputs.lock().unwrap();
        match outputs.pop_front() {
            Some(output) => {
                *self.last.lock().unwrap() = Some(output.clone());
                output
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(ProviderError::Unavailable("mock not scripted".to_string()))),
        }
    }
}

#[async_trait]
impl PairingProvider for MockPairingProvider {
    async fn generate(&self, request: &PairingRequest) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Generate(request.clone()));
        self.next_output()
    }

    async fn refine(&self, request: &RefinementRequest) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Refine(request.clone()));
        self.next_output()
    }
}
