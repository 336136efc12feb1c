//! Error types for edgecam

use thiserror::Error;

/// Result type alias for edgecam operations
pub type Result<T> = std::result::Result<T, Error>;

/// edgecam error type
#[derive(Error, Debug)]
pub enum Error {
    // Caller contract errors
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(i64),

    #[error("Invalid mode name: {0}")]
    InvalidMode(String),

    // Pipeline errors
    #[error("Pipeline stopped")]
    PipelineStopped,

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    // General errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand used by the validation paths
    pub(crate) fn contract(msg: impl Into<String>) -> Self {
        Error::ContractViolation(msg.into())
    }

    /// Check if the caller handed us malformed frames or dimensions
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::ContractViolation(_))
    }

    /// Check if this error is recoverable (the next frame may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ContractViolation(_) | Error::Pipeline(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::contract("bad size").is_contract_violation());
        assert!(Error::contract("bad size").is_recoverable());
        assert!(!Error::UnsupportedMode(7).is_contract_violation());
        assert!(!Error::PipelineStopped.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::UnsupportedMode(3).to_string(),
            "Unsupported mode: 3"
        );
        assert_eq!(
            Error::contract("width is zero").to_string(),
            "Contract violation: width is zero"
        );
    }
}
