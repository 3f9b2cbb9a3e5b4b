//! The framework-neutral response and its container-backed implementation.
//!
//! Resources and message body writers talk to an [`HttpResponse`]. The
//! [`ContainerResponseAdapter`] implements it on top of any
//! [`ContainerResponse`](micro_container::response::ContainerResponse), forwarding every
//! call to the container and exposing the container headers through a live
//! [`OutputHeaders`] view.

use crate::cookie::NewCookie;
use crate::error::RestError;
use async_trait::async_trait;
use micro_container::response::OutputStream;
use std::sync::Arc;

mod adapter;
mod headers;

pub use adapter::ContainerResponseAdapter;
pub use headers::OutputHeaders;

/// Response control surface used by the framework.
///
/// An implementation serves exactly one response and is not shared between requests.
#[async_trait]
pub trait HttpResponse: Send + Sync {
    /// Live view over the outbound headers.
    type Headers;

    /// Body stream of the response.
    type Output: OutputStream;

    /// The last status set through this response, 200 until one is set.
    fn status(&self) -> u16;

    fn set_status(&mut self, status: u16) -> Result<(), RestError>;

    /// The current header view. A new view is created on [`HttpResponse::reset`].
    fn output_headers(&self) -> Arc<Self::Headers>;

    fn output_stream(&self) -> Result<Self::Output, RestError>;

    fn add_new_cookie(&self, cookie: &NewCookie) -> Result<(), RestError>;

    async fn send_error(&self, status: u16) -> Result<(), RestError>;

    async fn send_error_with_message(&self, status: u16, message: &str) -> Result<(), RestError>;

    fn is_committed(&self) -> bool;

    fn reset(&mut self) -> Result<(), RestError>;
}
