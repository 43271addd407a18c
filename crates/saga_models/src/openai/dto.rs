//! Wire types for the chat-completions endpoint.

use saga_core::Role;
use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, system role first
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A role-tagged message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

/// Chat completion response body.
///
/// Only the fields Saga reads are required; compatible servers often omit
/// the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Completion identifier
    #[serde(default)]
    pub id: String,
    /// Model that produced the completion
    #[serde(default)]
    pub model: String,
    /// Generated completions
    pub choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// The generated message
    pub message: ChoiceMessage,
    /// Reason generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChoiceMessage {
    /// Author, normally "assistant"
    #[serde(default)]
    pub role: String,
    /// Generated content; `null` for refusals and tool calls
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_unset_options() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage {
                role: Role::System,
                content: "You are a storyteller.".to_string(),
            }],
            max_tokens: None,
            temperature: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "system", "content": "You are a storyteller."}]
            })
        );
    }

    #[test]
    fn test_minimal_response_deserializes() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "RESPONSE: hi"}}]
        });
        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert!(response.usage.is_none());
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("RESPONSE: hi")
        );
    }

    #[test]
    fn test_null_content_deserializes() {
        let body = json!({
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null},
                "finish_reason": "content_filter"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 0, "total_tokens": 3}
        });
        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert!(response.choices[0].message.content.is_none());
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(3));
    }
}
