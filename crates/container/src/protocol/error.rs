use std::io;
use thiserror::Error;

/// Errors raised by a container response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response has already been committed")]
    Committed,

    #[error("response output has been closed")]
    Closed,

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("send error: {source}")]
    Send {
        #[from]
        source: SendError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ResponseError {
    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the error was raised because the response was already committed.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Errors raised while encoding a committed response onto the transport.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
