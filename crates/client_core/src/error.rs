use std::fmt;

use shared::domain::ServerId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection, timeout or body read failure.
    Network,
    /// 2xx response carrying an `{"error": ...}` body.
    ServerError,
    /// Any non-2xx status.
    StatusCode(u16),
    /// 2xx response that is not JSON or does not match the expected payload.
    MalformedResponse,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Network => f.write_str("network"),
            TransportErrorKind::ServerError => f.write_str("server error"),
            TransportErrorKind::StatusCode(code) => write!(f, "status {code}"),
            TransportErrorKind::MalformedResponse => f.write_str("malformed response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::ServerError, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::StatusCode(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::MalformedResponse, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server {id} is not in the current server list")]
pub struct NotFoundError {
    pub id: ServerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
