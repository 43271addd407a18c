//! Narrative error types.

/// Specific error conditions for narrative sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrativeErrorKind {
    /// Empty or missing theme, choice, or session identifier
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
    /// The session already played its final turn
    #[display("Session terminated: all {} turns have been played", max_turns)]
    SessionTerminated {
        /// Maximum number of turns for the session
        max_turns: u32,
    },
    /// `advance` was called before `start`
    #[display("Session not started: {}", _0)]
    SessionNotStarted(String),
    /// `start` was called on a session that is already running
    #[display("Session already started: {}", _0)]
    SessionAlreadyStarted(String),
    /// Failed to assemble a request for the model
    #[display("Failed to assemble request: {}", _0)]
    MessageAssembly(String),
}

/// Error type for narrative operations.
///
/// # Examples
///
/// ```
/// use saga_error::{NarrativeError, NarrativeErrorKind};
///
/// let err = NarrativeError::new(NarrativeErrorKind::SessionTerminated { max_turns: 10 });
/// assert!(format!("{}", err).contains("10 turns"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narrative Error: {} at line {} in {}", kind, line, file)]
pub struct NarrativeError {
    /// The specific error condition
    pub kind: NarrativeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrativeError {
    /// Create a new NarrativeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrativeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
