//! Model gateway implementations for Saga.
//!
//! The only production backend is [`OpenAiClient`], which speaks the
//! OpenAI chat-completions protocol and therefore also works against any
//! compatible server (local inference servers, proxies).
//!
//! ```no_run
//! use saga_models::{OpenAiClient, OpenAiConfig};
//! use saga_interface::SagaDriver;
//! use saga_core::{GenerateRequest, Message};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAiConfig::builder()
//!     .api_key(Some(std::env::var("OPENAI_API_KEY")?))
//!     .build()?;
//! let client = OpenAiClient::new(config)?;
//!
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Please start the adventure!")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod metrics;
mod openai;

pub use metrics::{CallOutcome, GatewayMetrics, StoryContext, classify_error};
pub use openai::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ChoiceMessage,
    OpenAiClient, OpenAiConfig, OpenAiConfigBuilder, Usage,
};
