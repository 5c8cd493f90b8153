use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),
}

impl BridgeError {
    /// Whether the failure may go away on a later attempt.
    ///
    /// A malformed request will fail the same way every time; everything else
    /// observed at the transport level is worth another try.
    pub fn is_transient(&self) -> bool {
        !matches!(self, BridgeError::InvalidRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BridgeError::Timeout.is_transient());
        assert!(BridgeError::Connection("refused".to_string()).is_transient());
        assert!(BridgeError::OperationFailed("reset".to_string()).is_transient());
        assert!(!BridgeError::InvalidRequest("bad url".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(BridgeError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            BridgeError::Connection("dns failure".to_string()).to_string(),
            "Connection failed: dns failure"
        );
    }
}
