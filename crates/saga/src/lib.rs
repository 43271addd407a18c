//! Saga - turn-staged interactive stories
//!
//! Saga tells a short story one turn at a time. The player supplies a theme,
//! the model writes an opening and four choices, and every choice the player
//! makes is sent back together with a directive for that point in the story
//! arc. After the final turn the story concludes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use saga::{NarrativeConfig, OpenAiClient, SagaConfig, SessionId, SessionRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SagaConfig::load(None)?;
//!     let registry = saga::build_registry(&config)?;
//!
//!     let id = SessionId::generate();
//!     let opening = registry.start(id.clone(), "a lighthouse keeper's last winter").await?;
//!     println!("{}", opening.narrative());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `saga_core` - messages, requests and the story response
//! - `saga_error` - error types
//! - `saga_interface` - the `SagaDriver` gateway trait
//! - `saga_models` - OpenAI-compatible gateway
//! - `saga_narrative` - stage director, prompts, parser, sessions
//! - `saga_server` - HTTP API
//!
//! This crate re-exports everything for convenience and adds layered
//! configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod telemetry;

pub use config::{ConfigFile, EnvOverrides, GatewaySettings, SagaConfig, ServerSettings};

pub use saga_core::*;
pub use saga_error::*;
pub use saga_interface::*;
pub use saga_models::*;
pub use saga_narrative::*;
pub use saga_server::*;

use std::sync::Arc;

/// Build the gateway client and a session registry around it.
///
/// # Errors
///
/// Fails if the gateway settings are invalid or the HTTP client cannot be
/// created.
pub fn build_registry(config: &SagaConfig) -> SagaResult<Arc<SessionRegistry<dyn Health>>> {
    let client = OpenAiClient::new(config.gateway.to_openai_config()?)?;
    if config.gateway.api_key.is_none() {
        tracing::warn!("No API key configured; set OPENAI_API_KEY if the gateway requires one");
    }
    let driver: Arc<dyn Health> = Arc::new(client);
    Ok(Arc::new(SessionRegistry::new(driver, config.narrative)))
}
