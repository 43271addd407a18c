//! Top-level error wrapper types.

use crate::{
    ConfigError, GatewayError, GatewayErrorKind, NarrativeError, NarrativeErrorKind, ServerError,
};

/// Every error condition a Saga operation can surface.
///
/// # Examples
///
/// ```
/// use saga_error::{SagaError, ConfigError};
///
/// let err: SagaError = ConfigError::new("temperature out of range").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SagaErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Narrative session contract violation
    #[from(NarrativeError)]
    Narrative(NarrativeError),
    /// External model call failed
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// HTTP surface lifecycle error
    #[from(ServerError)]
    Server(ServerError),
}

/// Saga error with kind discrimination.
///
/// # Examples
///
/// ```
/// use saga_error::{SagaResult, ConfigError};
///
/// fn might_fail() -> SagaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Saga Error: {}", _0)]
pub struct SagaError(Box<SagaErrorKind>);

impl SagaError {
    /// Create a new error from a kind.
    pub fn new(kind: SagaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SagaErrorKind {
        &self.0
    }

    /// Narrative error kind, if this is a narrative contract violation.
    pub fn narrative_kind(&self) -> Option<&NarrativeErrorKind> {
        match self.kind() {
            SagaErrorKind::Narrative(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Gateway error kind, if the external model call failed.
    pub fn gateway_kind(&self) -> Option<&GatewayErrorKind> {
        match self.kind() {
            SagaErrorKind::Gateway(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Whether the caller may retry the same operation unchanged.
    ///
    /// Only gateway failures qualify; session state is untouched when they occur.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), SagaErrorKind::Gateway(_))
    }
}

// Generic From implementation for any type that converts to SagaErrorKind
impl<T> From<T> for SagaError
where
    T: Into<SagaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Saga operations.
pub type SagaResult<T> = std::result::Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_are_retryable() {
        let err: SagaError = GatewayError::new(GatewayErrorKind::EmptyCompletion).into();
        assert!(err.is_retryable());
        assert!(err.narrative_kind().is_none());
    }

    #[test]
    fn narrative_errors_are_not_retryable() {
        let err: SagaError = NarrativeError::new(NarrativeErrorKind::SessionTerminated {
            max_turns: 10,
        })
        .into();
        assert!(!err.is_retryable());
        assert_eq!(
            err.narrative_kind(),
            Some(&NarrativeErrorKind::SessionTerminated { max_turns: 10 })
        );
    }
}
