use thiserror::Error;

use crate::checks::Expectation;
use crate::report::Step;

/// Main error type for the smoke runner
#[derive(Error, Debug)]
pub enum SmokeError {
    /// A status code or response shape did not match what the step expects
    #[error("{step}: expected {expectation}, got {actual}")]
    Assertion {
        step: Step,
        expectation: Expectation,
        actual: String,
    },

    /// A step could not start because an earlier step did not produce its input
    #[error("{step}: precondition not met: {reason}")]
    Precondition { step: Step, reason: String },

    /// Connection refused, timeout, or any other failure below HTTP
    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A completed run had failing checks
    #[error("{failed} of {total} checks failed")]
    ChecksFailed { failed: usize, total: usize },
}

impl SmokeError {
    /// Create an assertion failure
    pub fn assertion(step: Step, expectation: Expectation, actual: impl Into<String>) -> Self {
        Self::Assertion {
            step,
            expectation,
            actual: actual.into(),
        }
    }

    /// Create a precondition failure
    pub fn precondition<S: Into<String>>(step: Step, reason: S) -> Self {
        Self::Precondition {
            step,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            SmokeError::Assertion { .. } => 1,
            SmokeError::Precondition { .. } => 1,
            SmokeError::ChecksFailed { .. } => 1,
            SmokeError::Config { .. } => 2,
            SmokeError::Io { .. } => 3,
            SmokeError::Transport { .. } => 7,
        }
    }
}

impl From<config::ConfigError> for SmokeError {
    fn from(err: config::ConfigError) -> Self {
        SmokeError::config(err.to_string())
    }
}

impl From<toml::ser::Error> for SmokeError {
    fn from(err: toml::ser::Error) -> Self {
        SmokeError::config(format!("Failed to serialize configuration: {err}"))
    }
}

impl From<serde_json::Error> for SmokeError {
    fn from(err: serde_json::Error) -> Self {
        SmokeError::config(format!("Failed to serialize report: {err}"))
    }
}
