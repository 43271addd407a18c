//! Turn-staged narrative engine for Saga.
//!
//! A story is a fixed number of turns. Each turn the player picks one of four
//! choices, and the model is told both the choice and what the story should
//! accomplish at that point (introduce characters, foreshadow, build to the
//! climax, resolve, conclude). The model's free-text reply is then parsed
//! back into a narrative and exactly four new choices.
//!
//! - [`directive_for`]: the per-turn directive
//! - [`build_system_role`], [`build_user_message`], [`build_message_sequence`]:
//!   prompt composition and history replay
//! - [`parse_response`]: total parser for the `RESPONSE:`/`CHOICES:` grammar
//! - [`NarrativeSession`]: start/advance state machine for one story
//! - [`SessionRegistry`]: sessions addressed by id, each independently locked
//!
//! # Example
//!
//! ```rust,ignore
//! use saga_narrative::{NarrativeConfig, SessionId, SessionRegistry};
//! use saga_models::{OpenAiClient, OpenAiConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(OpenAiConfig::builder().build()?)?;
//! let registry = SessionRegistry::new(Arc::new(client), NarrativeConfig::default());
//!
//! let id = SessionId::generate();
//! let opening = registry.start(id.clone(), "a haunted lighthouse").await?;
//! let next = registry.advance(&id, &opening.choices()[0]).await?;
//! println!("{}", next.narrative());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod history;
mod parser;
mod prompt;
mod registry;
mod session;
mod stage;

pub use config::{NarrativeConfig, NarrativeConfigBuilder, ThemePolicy};
pub use history::{ConversationHistory, HistoryEntry};
pub use parser::{DEFAULT_CHOICES, DEFAULT_NARRATIVE, parse_response};
pub use prompt::{
    FALLBACK_THEME, INTRO_MESSAGE, RESPONSE_FORMAT, build_message_sequence, build_system_role,
    build_theme_request, build_user_message,
};
pub use registry::SessionRegistry;
pub use session::{NarrativeSession, SessionId, SessionSnapshot, SessionState, Theme};
pub use stage::{CLOSING_CHOICE, StageInstruction, StoryKind, StoryStage, directive_for};
