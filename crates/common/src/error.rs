//! Error types for dpservice operations

use thiserror::Error;

/// Result type alias using the dpservice Error
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes reported by dpservice in a response status.
pub mod error_codes {
    pub const NOT_FOUND: u32 = 201;
    pub const ALREADY_EXISTS: u32 = 202;
}

/// dpservice error types
#[derive(Error, Debug)]
pub enum Error {
    /// The remote call itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::Status),

    /// The service executed the call but reported a non-zero error code.
    #[error("[error code {code}] {message}")]
    Status { code: u32, message: String },

    /// A response field that should hold a structured value did not parse.
    #[error("error decoding {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn status(code: u32, message: impl Into<String>) -> Self {
        Error::Status {
            code,
            message: message.into(),
        }
    }

    pub fn decode(field: &'static str, reason: impl ToString) -> Self {
        Error::Decode {
            field,
            reason: reason.to_string(),
        }
    }

    /// The service error code, if this is a status error.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(error_codes::NOT_FOUND)
    }

    pub fn is_already_exists(&self) -> bool {
        self.code() == Some(error_codes::ALREADY_EXISTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = Error::status(error_codes::NOT_FOUND, "interface not found");
        assert_eq!(err.to_string(), "[error code 201] interface not found");
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_code_only_for_status_errors() {
        let err = Error::decode("underlay route", "invalid IP address syntax");
        assert_eq!(err.code(), None);
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "error decoding underlay route: invalid IP address syntax"
        );

        let err = Error::from(tonic::Status::unavailable("connection refused"));
        assert_eq!(err.code(), None);
        assert!(matches!(err, Error::Transport(_)));
    }
}
