//! Error types and handling for the `DroneWx` application

use thiserror::Error;

/// Main error type for the `DroneWx` application
#[derive(Error, Debug)]
pub enum DroneWxError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors raised before the forecast core is invoked
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Forecast source failures
    #[error("Forecast fetch error: {message}")]
    Fetch { message: String },
}

impl DroneWxError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new forecast fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Whether the caller supplied bad input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, DroneWxError::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DroneWxError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            DroneWxError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            DroneWxError::Fetch { .. } => {
                "Weather data is currently unavailable. Please try again later.".to_string()
            }
        }
    }
}
