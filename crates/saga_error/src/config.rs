//! Configuration error types.

/// Configuration error with source location.
///
/// Raised while loading or validating settings, never while a session runs.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Dotted key of the offending setting, when one is known
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use saga_error::ConfigError;
    ///
    /// let err = ConfigError::new("could not read saga.toml");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an error that names the offending setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use saga_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("gateway.temperature", "must be within 0.0..=2.0");
    /// assert_eq!(err.key.as_deref(), Some("gateway.temperature"));
    /// assert!(err.message.starts_with("gateway.temperature"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl AsRef<str>) -> Self {
        let key = key.into();
        let mut err = Self::new(format!("{}: {}", key, message.as_ref()));
        err.key = Some(key);
        err
    }
}
