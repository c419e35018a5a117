// ================================================================
// File: vivelink-common/src/error.rs
// ================================================================

use thiserror::Error;

/// Top-level error for both ends of the link.
///
/// Only `Config` is fatal. The loops recover every other variant inside the
/// iteration that produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tracking provider unavailable: {0}")]
    Provider(String),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures converting between a `FrameSnapshot` and datagram bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload ended early at line {line}, column {column}")]
    Truncated { line: usize, column: usize },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("invalid or missing field: {0}")]
    InvalidField(String),

    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("encoded frame is {len} bytes, limit is {max}")]
    Oversize { len: usize, max: usize },
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Eof => CodecError::Truncated {
                line: err.line(),
                column: err.column(),
            },
            Category::Data => CodecError::InvalidField(err.to_string()),
            Category::Syntax | Category::Io => CodecError::Malformed(err.to_string()),
        }
    }
}

/// Bad startup parameters. Reported before any loop starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("invalid port {0} (must be 1-65535)")]
    InvalidPort(u16),

    #[error("invalid poll rate {0} Hz (must be 1-1000)")]
    InvalidRate(u32),

    #[error("invalid trail length {0} (must be 1-10000)")]
    InvalidTrailLength(usize),

    #[error("invalid axis limit {0} (must be finite and > 0)")]
    InvalidAxisLimit(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_eof_maps_to_truncated() {
        let err = serde_json::from_str::<serde_json::Value>("{\"left\": {").unwrap_err();
        assert!(matches!(CodecError::from(err), CodecError::Truncated { .. }));
    }

    #[test]
    fn serde_syntax_maps_to_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{left}").unwrap_err();
        assert!(matches!(CodecError::from(err), CodecError::Malformed(_)));
    }

    #[test]
    fn config_error_wraps_into_top_level() {
        let err: Error = ConfigError::InvalidPort(0).into();
        assert!(err.to_string().contains("invalid port 0"));
    }
}
