// tnep/src/error.rs

use thiserror::Error;

use crate::types::Status;

/// Common error type for both TNEP roles.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("tnep already running")]
    AlreadyRunning,

    #[error("tnep not running")]
    NotRunning,

    /// A service is already active; it must be deselected first.
    #[error("permission denied: a service is already selected")]
    PermissionDenied,

    #[error("no such service: {index}")]
    NoSuchService { index: usize },

    #[error("decode error: {0}")]
    Decode(String),

    /// A declared field length runs past the available bytes.
    #[error("short buffer: need {expected} bytes, got {actual}")]
    ShortBuffer { expected: usize, actual: usize },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("no write function registered")]
    IoUnavailable,

    /// The peer answered with a non-success TNEP status.
    #[error("protocol error: status={status}")]
    Protocol { status: Status },

    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// True for the bounded-wait timeout returned by `process()` when no
    /// signal arrived. Host loops usually ignore it.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
