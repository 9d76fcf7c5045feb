//! Host-level error types for the location core.
//!
//! Kernel-internal conditions (a degenerate correlation window, a
//! reflected ray, too few corroborating stations) are never exceptions;
//! they are reported in-band as `Option::None`/sentinels, per the data
//! model. `LocatorError` exists only for failures that happen around the
//! kernels: bad job shapes, config validation, and I/O.
//!
//! Serialized as a tagged JSON object (`#[serde(tag = "name")]`) so an
//! out-of-process caller gets a clean discriminated union.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum LocatorError {
    /// I/O operation failed (file read, memory-map, etc.)
    #[error("IO error: {message}")]
    IoError { message: String },

    /// A job input does not satisfy the documented shape/invariants.
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    /// JSON/TOML (de)serialization failure.
    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl From<std::io::Error> for LocatorError {
    fn from(error: std::io::Error) -> Self {
        LocatorError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LocatorError {
    fn from(error: serde_json::Error) -> Self {
        LocatorError::ParseError {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for LocatorError {
    fn from(error: toml::de::Error) -> Self {
        LocatorError::ParseError {
            message: error.to_string(),
        }
    }
}

/// Convert a `LocatorError` into a JSON string, e.g. for an FFI/IPC
/// boundary that expects a plain string error channel.
impl From<LocatorError> for String {
    fn from(error: LocatorError) -> Self {
        serde_json::to_string(&error).unwrap_or_else(|_| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LocatorError::ValidationError {
            message: "window_size must be >= 2".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""name":"ValidationError"#));
        assert!(json.contains("window_size must be >= 2"));
    }

    #[test]
    fn test_error_deserialization() {
        let json = r#"{"name":"IoError","message":"file not found"}"#;
        let error: LocatorError = serde_json::from_str(json).unwrap();

        match error {
            LocatorError::IoError { message } => assert_eq!(message, "file not found"),
            _ => panic!("wrong error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let app_error: LocatorError = io_error.into();

        match app_error {
            LocatorError::IoError { message } => assert!(message.contains("missing")),
            _ => panic!("wrong error variant"),
        }
    }
}
