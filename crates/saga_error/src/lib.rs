//! Error types for the Saga library.
//!
//! This crate provides the foundation error types used throughout the Saga workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Malformed model output is deliberately absent from this hierarchy: the
//! response parser absorbs it and always produces a valid story response.
//!
//! # Examples
//!
//! ```
//! use saga_error::{NarrativeError, NarrativeErrorKind, SagaResult};
//!
//! fn check_theme(theme: &str) -> SagaResult<()> {
//!     if theme.trim().is_empty() {
//!         Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
//!             "theme must not be empty".to_string(),
//!         )))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_theme("").is_err());
//! assert!(check_theme("haunted lighthouse").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gateway;
mod narrative;
mod server;

pub use config::ConfigError;
pub use error::{SagaError, SagaErrorKind, SagaResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use narrative::{NarrativeError, NarrativeErrorKind};
pub use server::{ServerError, ServerErrorKind};
