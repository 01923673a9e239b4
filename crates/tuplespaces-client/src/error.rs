//! Client error types.

use thiserror::Error;
use tonic::Code;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The call failed with a gRPC status, either reported by the server or
    /// synthesized by the transport (connection refused, timeout, ...).
    #[error("RPC error ({}): {}", .0.code(), .0.message())]
    Rpc(Box<tonic::Status>),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The connection was already shut down.
    #[error("connection closed")]
    Closed,
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Error::Rpc(Box::new(status))
    }
}

impl Error {
    /// Failure detail shown to the operator in debug mode.
    ///
    /// RPC failures yield the status message; everything else falls back to
    /// the display form.
    pub fn detail(&self) -> String {
        match self {
            Error::Rpc(status) => status.message().to_string(),
            other => other.to_string(),
        }
    }

    /// The gRPC status code, if the call got that far.
    pub fn code(&self) -> Option<Code> {
        match self {
            Error::Rpc(status) => Some(status.code()),
            _ => None,
        }
    }

    /// Check if the server could not be reached.
    pub fn is_unavailable(&self) -> bool {
        self.code() == Some(Code::Unavailable)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
