// libsnep-rs/libsnep/src/error.rs

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid length: expected at least {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("malformed message: {0}")]
    Format(String),

    #[error("malformed ndef message: {0}")]
    Ndef(String),

    #[error("unsupported snep version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("invalid response from peer: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse { expected: u8, actual: u8 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("operation timed out")]
    Timeout,

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("socket not connected")]
    NotConnected,

    #[error("socket already in use")]
    AlreadyInUse,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Coarse error classes used by callers that only care about the failure
/// family, not the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, peer close or deadline.
    Io,
    /// Bytes that cannot be decoded.
    Format,
    /// Peer broke the continuation handshake.
    Protocol,
    /// Operation not allowed in the current connection state.
    State,
    /// Caller supplied invalid input.
    Argument,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLength { .. }
            | Error::Format(_)
            | Error::Ndef(_)
            | Error::UnsupportedVersion { .. } => ErrorKind::Format,
            Error::UnexpectedResponse { .. } => ErrorKind::Protocol,
            Error::Io(_) | Error::ConnectionClosed | Error::Timeout | Error::ServiceUnavailable(_) => {
                ErrorKind::Io
            }
            Error::NotConnected | Error::AlreadyInUse => ErrorKind::State,
            Error::InvalidArgument(_) | Error::UnsupportedOperation(_) => ErrorKind::Argument,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
