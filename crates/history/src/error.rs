/// Errors that can occur during history store operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Connection error (network failure, DNS resolution, etc.).
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status returned by the engine.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message, including the response body when available.
        message: String,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("failed to decode engine response: {0}")]
    Decode(String),

    /// Deletion targeted an instance the engine no longer knows about.
    #[error("history instance not found: {0}")]
    NotFound(String),
}

impl HistoryError {
    /// Returns `true` if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this error indicates a missing instance.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_message() {
        let err = HistoryError::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn not_found_predicate() {
        assert!(HistoryError::NotFound("abc".to_string()).is_not_found());
        assert!(!HistoryError::Connection("refused".to_string()).is_not_found());
    }
}
