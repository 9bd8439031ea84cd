//! Error types for Redman

use thiserror::Error;

/// Core error type for Redman operations
#[derive(Error, Debug)]
pub enum Error {
    /// A connection name that does not exist in configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A native Redis type code with no canonical mapping.
    #[error("Unsupported key type: {0}")]
    UnsupportedType(String),

    /// A request mapping missing fields or carrying unparseable values.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An operation the target structure does not offer.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// An error returned by the Redis server or client library,
    /// surfaced with its message intact.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Redman operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = Error::Configuration("unknown connection: staging".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown connection: staging"
        );
    }

    #[test]
    fn test_unsupported_type_display() {
        let err = Error::UnsupportedType("geo".to_string());
        assert_eq!(err.to_string(), "Unsupported key type: geo");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serde_error_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("{");
        let err: Error = bad.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
