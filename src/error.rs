//! Application error types

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message suitable for an error banner.
    ///
    /// Backend-reported errors are shown verbatim; transport failures get a
    /// short human-readable line instead of the full reqwest chain.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Backend(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Http(e) if e.is_connect() => {
                "Cannot reach the backend. Is it running?".to_string()
            }
            AppError::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_surface_verbatim() {
        let err = AppError::Backend("File not found".to_string());
        assert_eq!(err.user_message(), "File not found");
    }

    #[test]
    fn internal_errors_keep_the_prefix() {
        let err = AppError::Internal("panel task dropped".to_string());
        assert!(err.user_message().contains("Internal error"));
    }
}
