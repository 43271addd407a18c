//! Error types for the external model gateway.

/// Error kinds for model gateway calls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// Transport-level failure (connection refused, DNS, TLS)
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// The request exceeded the configured timeout
    #[display("Request timed out: {}", _0)]
    Timeout(String),

    /// The provider answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The provider answered with a body we could not decode
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),

    /// The provider answered successfully but without any text
    #[display("Model returned an empty completion")]
    EmptyCompletion,

    /// The gateway client is misconfigured
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The error kind
    pub kind: GatewayErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
