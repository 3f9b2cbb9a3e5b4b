//! The container response contract and its buffered implementation.
//!
//! [`ContainerResponse`] is the response object a container hands to the layers above
//! it. It is a handle: every method takes `&self`, and clones or views created from it
//! all observe the same response. The response goes through two states:
//!
//! - **open**: status, headers and cookies can be changed, body bytes are buffered
//! - **committed**: the head has been written to the transport, later mutations follow
//!   the configured [`CommittedPolicy`](crate::config::CommittedPolicy)
//!
//! [`BufferedResponse`] implements the contract over any `tokio::io::AsyncWrite`.

use crate::protocol::{Cookie, ResponseError};
use async_trait::async_trait;
use http::{HeaderName, HeaderValue};

mod buffered_response;
mod output;

pub use buffered_response::BufferedResponse;
pub use output::ResponseOutput;

/// The response object supplied by a container.
#[async_trait]
pub trait ContainerResponse: Send + Sync {
    /// The body stream returned by [`ContainerResponse::output_stream`].
    type Output: OutputStream;

    /// Sets the status code. Codes that can not appear on a status line are rejected.
    ///
    /// Returns whether the status was applied. A committed response under
    /// [`CommittedPolicy::Ignore`](crate::config::CommittedPolicy::Ignore) drops it and
    /// returns `false`.
    fn set_status(&self, status: u16) -> Result<bool, ResponseError>;

    fn status(&self) -> u16;

    /// Appends a value, keeping the values already present under `name`.
    fn add_header(&self, name: &str, value: HeaderValue) -> Result<(), ResponseError>;

    /// Replaces every value present under `name`.
    fn set_header(&self, name: &str, value: HeaderValue) -> Result<(), ResponseError>;

    fn remove_header(&self, name: &str) -> Result<(), ResponseError>;

    /// Values under `name` in insertion order, empty when the header is absent.
    fn header_values(&self, name: &str) -> Vec<HeaderValue>;

    fn header_names(&self) -> Vec<HeaderName>;

    fn add_cookie(&self, cookie: Cookie) -> Result<(), ResponseError>;

    fn output_stream(&self) -> Result<Self::Output, ResponseError>;

    /// Replaces the buffered body with an error page and commits the response.
    async fn send_error(&self, status: u16, message: Option<String>) -> Result<(), ResponseError>;

    fn is_committed(&self) -> bool;

    /// Clears status, headers, cookies and buffered body. Fails once committed.
    fn reset(&self) -> Result<(), ResponseError>;

    /// Commits the response and writes out whatever body is buffered.
    async fn flush_buffer(&self) -> Result<(), ResponseError>;
}

/// Body stream of a container response.
#[async_trait]
pub trait OutputStream: Send {
    async fn write(&mut self, buf: &[u8]) -> Result<(), ResponseError>;

    async fn flush(&mut self) -> Result<(), ResponseError>;

    /// Ends the body. Further writes fail with [`ResponseError::Closed`].
    async fn close(&mut self) -> Result<(), ResponseError>;
}
