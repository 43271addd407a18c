//! Conversion between Saga and chat-completions wire types.

use super::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiConfig};
use saga_core::{GenerateRequest, GenerateResponse, TokenUsage};
use saga_error::{GatewayError, GatewayErrorKind};

/// Build the wire request, filling unset options from the client config.
pub fn to_chat_request(req: &GenerateRequest, config: &OpenAiConfig) -> ChatCompletionRequest {
    let messages = req
        .messages()
        .iter()
        .map(|m| ChatMessage {
            role: m.role,
            content: m.content.clone(),
        })
        .collect();

    ChatCompletionRequest {
        model: req.model().clone().unwrap_or_else(|| config.model().clone()),
        messages,
        max_tokens: Some(req.max_tokens().unwrap_or(*config.max_tokens())),
        temperature: Some(req.temperature().unwrap_or(*config.temperature())),
    }
}

/// Take the first choice's text.
///
/// A missing choice or blank content is an [`GatewayErrorKind::EmptyCompletion`].
pub fn from_chat_response(response: ChatCompletionResponse) -> Result<GenerateResponse, GatewayError> {
    let usage = response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::new(GatewayErrorKind::EmptyCompletion))?;

    let text = choice
        .message
        .content
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| GatewayError::new(GatewayErrorKind::EmptyCompletion))?;

    GenerateResponse::builder()
        .text(text)
        .finish_reason(choice.finish_reason)
        .usage(usage)
        .build()
        .map_err(|e| GatewayError::new(GatewayErrorKind::Deserialization(e.to_string())))
}
