//! OpenAI chat-completions integration.

mod client;
mod config;
mod conversions;
mod dto;

pub use client::OpenAiClient;
pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use dto::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ChoiceMessage, Usage,
};
