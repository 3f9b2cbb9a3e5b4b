use crate::cookie::NewCookie;
use crate::error::RestError;
use crate::response::{HttpResponse, OutputHeaders};
use async_trait::async_trait;
use http::StatusCode;
use micro_container::protocol::Cookie;
use micro_container::response::ContainerResponse;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, error};

/// An [`HttpResponse`] forwarding every call to a container response.
///
/// The status is remembered locally and only updated once the container applied it, so
/// [`HttpResponse::status`] never asks the container. A status dropped by a committed
/// container leaves the remembered one unchanged. The container must not be mutated
/// behind the adapter's back, or the two can disagree.
pub struct ContainerResponseAdapter<R> {
    response: Arc<R>,
    status: u16,
    output_headers: Arc<OutputHeaders<R>>,
}

impl<R> ContainerResponseAdapter<R>
where
    R: ContainerResponse,
{
    pub fn new(response: R) -> Self {
        let response = Arc::new(response);
        let output_headers = Arc::new(OutputHeaders::new(Arc::clone(&response)));
        Self { response, status: StatusCode::OK.as_u16(), output_headers }
    }

    /// The wrapped container response.
    pub fn container_response(&self) -> &R {
        &self.response
    }

    /// Gives the container response back once no header view handed out is alive.
    pub fn into_container_response(self) -> Result<R, Self> {
        if Arc::strong_count(&self.output_headers) > 1 {
            return Err(self);
        }

        let Self { response, status, output_headers } = self;
        drop(output_headers);
        // a stale view from before a reset may still hold the response
        Arc::try_unwrap(response).map_err(|response| {
            let output_headers = Arc::new(OutputHeaders::new(Arc::clone(&response)));
            Self { response, status, output_headers }
        })
    }
}

impl<R> Debug for ContainerResponseAdapter<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerResponseAdapter").field("status", &self.status).finish_non_exhaustive()
    }
}

#[async_trait]
impl<R> HttpResponse for ContainerResponseAdapter<R>
where
    R: ContainerResponse,
{
    type Headers = OutputHeaders<R>;
    type Output = R::Output;

    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) -> Result<(), RestError> {
        if self.response.set_status(status)? {
            self.status = status;
        } else {
            debug!(status, "container dropped the status, response is committed");
        }
        Ok(())
    }

    fn output_headers(&self) -> Arc<Self::Headers> {
        Arc::clone(&self.output_headers)
    }

    fn output_stream(&self) -> Result<Self::Output, RestError> {
        Ok(self.response.output_stream()?)
    }

    fn add_new_cookie(&self, cookie: &NewCookie) -> Result<(), RestError> {
        self.response.add_cookie(to_container_cookie(cookie))?;
        Ok(())
    }

    async fn send_error(&self, status: u16) -> Result<(), RestError> {
        self.response.send_error(status, None).await.map_err(|e| {
            error!(status, cause = %e, "send error response failed");
            RestError::from(e)
        })
    }

    async fn send_error_with_message(&self, status: u16, message: &str) -> Result<(), RestError> {
        self.response.send_error(status, Some(message.to_string())).await.map_err(|e| {
            error!(status, cause = %e, "send error response failed");
            RestError::from(e)
        })
    }

    fn is_committed(&self) -> bool {
        self.response.is_committed()
    }

    fn reset(&mut self) -> Result<(), RestError> {
        self.response.reset()?;
        // the container dropped its headers, views handed out so far are stale
        self.status = StatusCode::OK.as_u16();
        self.output_headers = Arc::new(OutputHeaders::new(Arc::clone(&self.response)));
        debug!("response reset, output headers rebuilt");
        Ok(())
    }
}

/// Optional attributes are only set when present, so the container keeps its defaults.
fn to_container_cookie(new_cookie: &NewCookie) -> Cookie {
    let mut cookie = Cookie::new(new_cookie.name(), new_cookie.value());
    cookie.set_max_age(new_cookie.max_age());
    cookie.set_version(new_cookie.version());
    if let Some(domain) = new_cookie.domain() {
        cookie.set_domain(domain);
    }
    if let Some(path) = new_cookie.path() {
        cookie.set_path(path);
    }
    cookie.set_secure(new_cookie.is_secure());
    if let Some(comment) = new_cookie.comment() {
        cookie.set_comment(comment);
    }
    cookie.set_http_only(new_cookie.is_http_only());
    cookie
}
