use micro_container::protocol::ResponseError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("container error: {source}")]
    Container {
        #[from]
        source: ResponseError,
    },

    #[error("invalid header value: {reason}")]
    InvalidHeaderValue { reason: String },

    #[error("invalid cookie: {reason}")]
    InvalidCookie { reason: String },
}

impl RestError {
    pub fn invalid_header_value<S: ToString>(str: S) -> Self {
        Self::InvalidHeaderValue { reason: str.to_string() }
    }

    pub fn invalid_cookie<S: ToString>(str: S) -> Self {
        Self::InvalidCookie { reason: str.to_string() }
    }

    /// Returns the underlying I/O failure when the container failed on its transport.
    pub fn as_io(&self) -> Option<&io::Error> {
        match self {
            Self::Container { source: ResponseError::Io { source } } => Some(source),
            _ => None,
        }
    }
}
