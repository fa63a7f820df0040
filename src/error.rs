// Error handling module
// Defines the client-facing error taxonomy

use thiserror::Error;

/// Errors surfaced to callers of the API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure: connection refused, timeout, TLS, or a
    /// response body that could not be read or decoded
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server replied with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Authentication could not be recovered; the caller must log in again
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// URL parsing or joining failed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (token store, plumbing)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::SessionExpired(_))
            || matches!(self, ClientError::Api { status: 401, .. })
    }

    /// Check if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status >= 500)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClientError::Api {
            status: 404,
            message: "user not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 - user not found");

        let err = ClientError::SessionExpired("refresh failed".to_string());
        assert_eq!(err.to_string(), "Session expired: refresh failed");

        let err = ClientError::Config("base URL is required".to_string());
        assert_eq!(err.to_string(), "Configuration error: base URL is required");
    }

    #[test]
    fn test_internal_error_message() {
        let err = ClientError::Internal(anyhow::anyhow!("token store lock poisoned"));
        assert_eq!(err.to_string(), "Internal error: token store lock poisoned");
    }

    #[test]
    fn test_status_accessor() {
        let err = ClientError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));

        let err = ClientError::SessionExpired("gone".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_auth_error_predicate() {
        assert!(ClientError::SessionExpired("x".to_string()).is_auth_error());
        assert!(ClientError::Api {
            status: 401,
            message: String::new()
        }
        .is_auth_error());
        assert!(!ClientError::Api {
            status: 500,
            message: String::new()
        }
        .is_auth_error());
    }

    #[test]
    fn test_server_error_predicate() {
        assert!(ClientError::Api {
            status: 502,
            message: String::new()
        }
        .is_server_error());
        assert!(!ClientError::Api {
            status: 404,
            message: String::new()
        }
        .is_server_error());
    }
}
