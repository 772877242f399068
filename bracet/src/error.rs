//! Error handling for the bracet CLI.

use thiserror::Error;

/// Errors the bracet CLI itself can raise, as distinct from evaluation
/// errors a subcommand reports as part of its normal output.
#[derive(Error, Debug)]
pub enum BracetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid --var argument '{0}': expected NAME=VALUE")]
    InvalidVar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BracetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_var_error_display() {
        let err = BracetError::InvalidVar("nope".to_string());
        assert_eq!(err.to_string(), "Invalid --var argument 'nope': expected NAME=VALUE");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BracetError = io_err.into();
        assert!(matches!(err, BracetError::Io(_)));
    }
}
