//! Scripted in-memory driver for tests.

use crate::{Health, HealthStatus, SagaDriver};
use async_trait::async_trait;
use saga_core::{GenerateRequest, GenerateResponse};
use saga_error::{GatewayError, GatewayErrorKind, SagaError, SagaResult};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A single scripted reply (success or gateway failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Reply with this completion text
    Success(String),
    /// Fail with this gateway error
    Error(GatewayErrorKind),
}

type Responder = dyn Fn(&GenerateRequest) -> MockResponse + Send + Sync;

/// How the mock chooses its reply.
#[derive(Clone)]
pub enum MockBehavior {
    /// Always return success with the given text
    Success(String),
    /// Always return the specified error
    Error(GatewayErrorKind),
    /// Return a sequence of replies, then fail once exhausted
    Sequence(Vec<MockResponse>),
    /// Compute the reply from the request
    Respond(Arc<Responder>),
}

#[derive(Default)]
struct MockState {
    requests: Vec<GenerateRequest>,
}

/// Mock model driver for testing.
///
/// Replies according to its [`MockBehavior`] and records every request so
/// tests can assert on the exact message sequence that was sent.
#[derive(Clone)]
pub struct MockDriver {
    behavior: MockBehavior,
    state: Arc<Mutex<MockState>>,
    latency: Duration,
    health: HealthStatus,
    model_name: String,
}

impl MockDriver {
    /// Create a mock driver with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            state: Arc::new(Mutex::new(MockState::default())),
            latency: Duration::ZERO,
            health: HealthStatus::Healthy,
            model_name: "mock-model".to_string(),
        }
    }

    /// Create a mock driver that always succeeds with the given text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Create a mock driver that always fails with the given error.
    pub fn new_error(error: GatewayErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Create a mock driver with a sequence of replies.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Create a mock driver that computes each reply from the request.
    pub fn new_responder<F>(responder: F) -> Self
    where
        F: Fn(&GenerateRequest) -> MockResponse + Send + Sync + 'static,
    {
        Self::new_with_behavior(MockBehavior::Respond(Arc::new(responder)))
    }

    /// Sleep this long inside every `generate` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Report this status from [`Health::health`].
    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    /// Get the number of times `generate` was called.
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.lock().requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_response(&self, req: &GenerateRequest) -> SagaResult<GenerateResponse> {
        let call_index = {
            let mut state = self.lock();
            state.requests.push(req.clone());
            state.requests.len() - 1
        };

        let reply = match &self.behavior {
            MockBehavior::Success(text) => MockResponse::Success(text.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::Respond(responder) => responder(req),
            MockBehavior::Sequence(responses) => match responses.get(call_index) {
                Some(reply) => reply.clone(),
                None => MockResponse::Error(GatewayErrorKind::Http(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    call_index + 1,
                    responses.len()
                ))),
            },
        };

        match reply {
            MockResponse::Success(text) => Ok(GenerateResponse::builder()
                .text(text)
                .finish_reason(Some("stop".to_string()))
                .build()
                .map_err(|e| {
                    SagaError::from(GatewayError::new(GatewayErrorKind::Deserialization(
                        e.to_string(),
                    )))
                })?),
            MockResponse::Error(kind) => Err(GatewayError::new(kind).into()),
        }
    }
}

#[async_trait]
impl SagaDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> SagaResult<GenerateResponse> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next_response(req)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl Health for MockDriver {
    async fn health(&self) -> SagaResult<HealthStatus> {
        Ok(self.health.clone())
    }
}
