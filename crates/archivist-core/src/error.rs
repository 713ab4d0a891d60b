//! Error types for calls made against the platform.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by platform API calls (responses, followups, command
/// registration).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The platform rejected the call.
    #[error("platform error ({code}): {message}")]
    Platform {
        /// Platform error code.
        code: i64,
        /// Human-readable reason.
        message: String,
    },

    /// The transport failed before the platform answered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete in time.
    #[error("API call timed out")]
    Timeout,
}

impl ApiError {
    /// Creates a platform rejection error.
    pub fn platform(code: i64, message: impl Into<String>) -> Self {
        Self::Platform {
            code,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type for platform API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_transport_errors() {
        let err = ApiError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"));

        assert!(matches!(err, ApiError::Transport(ref m) if m == "pipe closed"));
        assert_eq!(err.to_string(), "transport error: pipe closed");
    }
}
