// src/utils/errors.rs
//! Error types for the interception layer

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Errors raised by wrapping, interception, or the host object model
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The root target cannot be followed under the normalized configuration
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A mutating operation reached a view created in `error` read-only mode
    #[error("the object is read only: cannot {operation} at '{path}'")]
    ReadOnlyViolation {
        operation: &'static str,
        path: String,
    },

    /// A setter rule explicitly returned `false`
    #[error("write rejected at '{path}'")]
    RejectedWrite { path: String },

    /// Property access on `undefined` or `null`
    #[error("cannot access property '{name}' of {found}")]
    NotAnObject { name: String, found: &'static str },

    /// Call on a value that is not a function
    #[error("{0} is not callable")]
    NotCallable(&'static str),

    /// Construction of a value that has no constructor
    #[error("{0} is not a constructor")]
    NotConstructible(&'static str),

    /// A constructor or construct rule produced a primitive
    #[error("construct at '{path}' returned {found}, expected an object")]
    InvalidConstructResult { path: String, found: &'static str },

    /// Conversion of a cyclic graph to JSON
    #[error("cannot convert cyclic value to JSON")]
    CyclicValue,

    /// Failure raised by a host function or a rule
    #[error("host error: {0}")]
    Host(String),

    /// Logging or metrics setup failure
    #[error("observability error: {0}")]
    Observability(String),

    /// Settings could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProxyError {
    /// Create a host error from any displayable message
    pub fn host(message: impl Into<String>) -> Self {
        ProxyError::Host(message.into())
    }

    /// Returns true for read-only violations
    pub fn is_read_only_violation(&self) -> bool {
        matches!(self, ProxyError::ReadOnlyViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_message() {
        let err = ProxyError::ReadOnlyViolation {
            operation: "set",
            path: ".a.b".to_string(),
        };
        assert!(err.is_read_only_violation());
        assert_eq!(
            err.to_string(),
            "the object is read only: cannot set at '.a.b'"
        );
    }

    #[test]
    fn test_host_error() {
        let err = ProxyError::host(format!("lookup of {} failed", "user"));
        assert!(matches!(&err, ProxyError::Host(message) if message == "lookup of user failed"));
        assert_eq!(err.to_string(), "host error: lookup of user failed");
        assert!(!err.is_read_only_violation());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ProxyError = parse.unwrap_err().into();
        assert!(matches!(err, ProxyError::Serialization(_)));
    }
}
