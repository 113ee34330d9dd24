//! Error types and handling for the `TourAI` service

use thiserror::Error;

/// Main error type for the `TourAI` service
#[derive(Error, Debug)]
pub enum TourAiError {
    /// Configuration-related errors, including missing provider credentials
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

}

impl TourAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole request instead of being
    /// absorbed as a per-place or per-segment miss.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, TourAiError::Config { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TourAiError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TourAiError::Api { .. } => {
                "Unable to reach an external service. Please try again later.".to_string()
            }
            TourAiError::Validation { message } => message.clone(),
        }
    }
}
