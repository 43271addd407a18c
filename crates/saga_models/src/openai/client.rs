//! OpenAI chat-completions driver using reqwest.

use super::{ChatCompletionRequest, ChatCompletionResponse, OpenAiConfig, conversions};
use crate::{CallOutcome, GatewayMetrics, StoryContext};
use async_trait::async_trait;
use saga_core::{GenerateRequest, GenerateResponse};
use saga_error::{GatewayError, GatewayErrorKind, SagaResult};
use saga_interface::{Health, HealthStatus, SagaDriver};
use std::time::Instant;
use tracing::{debug, error, instrument};

/// Driver for OpenAI and API-compatible servers.
///
/// Each `generate` call is a single request with no retry; the configured
/// timeout bounds the whole exchange.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url(), model = %config.model()))]
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| {
                GatewayError::new(GatewayErrorKind::Configuration(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        debug!("Created OpenAI client");
        Ok(Self { config, client })
    }

    /// The client configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Send one chat completion request.
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let url = self.config.completions_url();
        debug!(url = %url, "Sending chat completion request");

        let mut req = self.client.post(&url).json(request);
        if let Some(api_key) = self.config.api_key() {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Provider returned error status");
            return Err(GatewayError::new(GatewayErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                error!(error = %e, "Failed to decode chat completion");
                GatewayError::new(GatewayErrorKind::Deserialization(e.to_string()))
            }
        })
    }

    async fn generate_inner(&self, req: &GenerateRequest) -> Result<GenerateResponse, GatewayError> {
        let chat_request = conversions::to_chat_request(req, &self.config);
        let response = self.chat_completion(&chat_request).await?;
        conversions::from_chat_response(response)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        error!(error = %e, "Request timed out");
        GatewayError::new(GatewayErrorKind::Timeout(e.to_string()))
    } else {
        error!(error = %e, "HTTP request failed");
        GatewayError::new(GatewayErrorKind::Http(e.to_string()))
    }
}

#[async_trait]
impl SagaDriver for OpenAiClient {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.config.model()))]
    async fn generate(&self, req: &GenerateRequest) -> SagaResult<GenerateResponse> {
        let metrics = GatewayMetrics::get();
        let model = req.model().as_deref().unwrap_or(self.config.model().as_str());
        let context = StoryContext::of(req);
        let started = Instant::now();

        let result = self.generate_inner(req).await;
        let outcome = match &result {
            Ok(_) => CallOutcome::Ok,
            Err(e) => CallOutcome::failed(&e.kind),
        };
        metrics.record_call(self.provider_name(), model, context, outcome, started.elapsed());

        let response = result?;
        if let Some(usage) = response.usage() {
            metrics.record_usage(model, usage);
        }
        debug!(
            chars = response.text().len(),
            depth = context.depth,
            "Received completion"
        );
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

#[async_trait]
impl Health for OpenAiClient {
    #[instrument(skip(self))]
    async fn health(&self) -> SagaResult<HealthStatus> {
        let mut req = self.client.get(self.config.models_url());
        if let Some(api_key) = self.config.api_key() {
            req = req.bearer_auth(api_key);
        }

        let status = match req.send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Healthy,
            Ok(response) => HealthStatus::Unhealthy {
                message: format!("Provider returned {}", response.status()),
            },
            Err(e) => HealthStatus::Unhealthy {
                message: format!("Provider unreachable: {}", e),
            },
        };

        debug!(?status, "Health check complete");
        Ok(status)
    }
}
