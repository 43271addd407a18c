//! Request and response types for model generation.

use crate::Message;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single completion request handed to a model driver.
///
/// The message order is the exact order the driver must send.
///
/// # Examples
///
/// ```
/// use saga_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![
///         Message::system("You are a storyteller."),
///         Message::user("Please start the adventure!"),
///     ])
///     .max_tokens(500_u32)
///     .temperature(0.8_f32)
///     .model("gpt-3.5-turbo".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 2);
/// assert_eq!(*request.max_tokens(), Some(500));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send, system role first
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    max_tokens: Option<u32>,
    /// Sampling temperature
    temperature: Option<f32>,
    /// Model identifier to use; drivers fall back to their own default
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// The text completion returned by a model driver.
///
/// # Examples
///
/// ```
/// use saga_core::GenerateResponse;
///
/// let response = GenerateResponse::builder()
///     .text("RESPONSE: The gate creaks open.")
///     .build()
///     .unwrap();
///
/// assert!(response.text().starts_with("RESPONSE:"));
/// assert!(response.usage().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into), default)]
pub struct GenerateResponse {
    /// The generated text
    text: String,
    /// Provider finish reason ("stop", "length", ...)
    finish_reason: Option<String>,
    /// Token usage, when reported
    usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Start building a response.
    pub fn builder() -> GenerateResponseBuilder {
        GenerateResponseBuilder::default()
    }

    /// Consume the response, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
