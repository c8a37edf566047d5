//! Error types for the CLI application.
//!
//! This module defines the error types used throughout the CLI for better
//! error propagation and handling.
//!
//! ## Batch Validation Errors
//!
//! The `BatchValidationError<T>` type collects per-item failures for commands
//! that walk many records, such as `replay`, so every mismatch can be reported
//! before the command fails.

use std::fmt;

use ludo_engine::errors::GameError;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
///
/// This enum encompasses all error types that can occur during CLI execution,
/// allowing for proper error propagation using the `?` operator.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine-related error
    Engine(String),

    /// Operation was interrupted before completing
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

/// Generic error type for batch validation operations.
///
/// # Type Parameters
///
/// * `T` - Context type identifying the failed item (a game id, a line
///   number). Must implement `Display` for error formatting.
///
/// # Examples
///
/// ```rust
/// use ludo_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: "20250102-000003".to_string(),
///     message: "winner differs".to_string(),
/// };
/// assert_eq!(error.to_string(), "20250102-000003: winner differs");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    /// Context identifying the item that failed validation
    pub item_context: T,
    /// Descriptive error message
    pub message: String,
}

impl<T: fmt::Display> fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}
