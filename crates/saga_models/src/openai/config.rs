//! Connection settings for the OpenAI-compatible client.

use derive_builder::Builder;
use derive_getters::Getters;
use std::time::Duration;

/// Default endpoint root; `/chat/completions` is appended per request.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used when neither the request nor the config names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Settings for [`OpenAiClient`](super::OpenAiClient).
///
/// `max_tokens` and `temperature` apply when a request leaves them unset.
///
/// # Examples
///
/// ```
/// use saga_models::OpenAiConfig;
/// use std::time::Duration;
///
/// let config = OpenAiConfig::builder()
///     .base_url("http://localhost:8080/v1")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.model(), "gpt-3.5-turbo");
/// assert_eq!(*config.max_tokens(), 500);
/// assert!(config.api_key().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Builder)]
#[builder(setter(into))]
pub struct OpenAiConfig {
    /// Endpoint root, e.g. `https://api.openai.com/v1`
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Default model identifier
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// Bearer credential; omitted from requests when `None`
    #[builder(default)]
    api_key: Option<String>,
    /// Default completion length cap
    #[builder(default = "500")]
    max_tokens: u32,
    /// Default sampling temperature
    #[builder(default = "0.8")]
    temperature: f32,
    /// Whole-request timeout
    #[builder(default = "Duration::from_secs(60)")]
    timeout: Duration,
}

impl OpenAiConfig {
    /// Start building a configuration.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }

    /// URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// URL of the model listing endpoint, used for health checks.
    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url.trim_end_matches('/'))
    }
}
