use crate::codec::ResponseEncoder;
use crate::config::{CommittedPolicy, ContainerConfig};
use crate::protocol::{Cookie, Message, PayloadItem, PayloadSize, ResponseError, ResponseHead};
use crate::response::{ContainerResponse, ResponseOutput};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::SinkExt;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode, header};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::AsyncWrite;
use tokio_util::codec::FramedWrite;
use tracing::{debug, info, warn};

type Frame = Message<(ResponseHead, PayloadSize)>;

/// A container response that buffers its body and commits on demand.
///
/// The body is held in memory until one of the following happens:
///
/// - the buffer reaches [`ContainerConfig::buffer_size`], the response is committed with a
///   chunked body and every later write goes straight to the transport
/// - [`ContainerResponse::flush_buffer`] is called, same as above
/// - the output stream is closed while still open, the whole body is written with a
///   `Content-Length`
/// - [`ContainerResponse::send_error`] is called, the body is replaced with an error page
///
/// `BufferedResponse` is a cheap handle, clones share the same response.
pub struct BufferedResponse<W> {
    shared: Arc<Shared<W>>,
}

struct Shared<W> {
    config: ContainerConfig,
    state: Mutex<ResponseState>,
    // locked before `state` by every path that writes to the transport
    transport: tokio::sync::Mutex<FramedWrite<W, ResponseEncoder>>,
}

#[derive(Debug)]
struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    buffer: BytesMut,
    phase: Phase,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Open,
    Committed,
    Closed,
}

impl ResponseState {
    fn new(buffer_size: usize) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            buffer: BytesMut::with_capacity(buffer_size),
            phase: Phase::Open,
        }
    }

    fn clear(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.cookies.clear();
        self.buffer.clear();
    }
}

impl<W> BufferedResponse<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, ContainerConfig::default())
    }

    pub fn with_config(writer: W, config: ContainerConfig) -> Self {
        let state = ResponseState::new(config.buffer_size());
        let transport = FramedWrite::new(writer, ResponseEncoder::new());
        Self { shared: Arc::new(Shared { config, state: Mutex::new(state), transport: tokio::sync::Mutex::new(transport) }) }
    }

    pub(crate) async fn write_body(&self, buf: &[u8]) -> Result<(), ResponseError> {
        let mut transport = self.shared.transport.lock().await;
        let frames = {
            let mut state = self.state();
            match state.phase {
                Phase::Closed => return Err(ResponseError::Closed),
                _ if buf.is_empty() => return Ok(()),
                Phase::Committed => vec![Message::from(Bytes::copy_from_slice(buf))],
                Phase::Open => {
                    state.buffer.extend_from_slice(buf);
                    if state.buffer.len() < self.shared.config.buffer_size() {
                        return Ok(());
                    }
                    debug!(buffered = state.buffer.len(), "response buffer is full");
                    self.commit(&mut state, PayloadSize::Chunked)
                }
            }
        };

        for frame in frames {
            transport.feed(frame).await?;
        }
        Ok(())
    }

    pub(crate) async fn close(&self) -> Result<(), ResponseError> {
        let mut transport = self.shared.transport.lock().await;
        let frames = {
            let mut state = self.state();
            let mut frames = match state.phase {
                Phase::Closed => return Ok(()),
                Phase::Committed => Vec::with_capacity(1),
                Phase::Open => {
                    let payload_size = PayloadSize::of_buffered(state.buffer.len());
                    self.commit(&mut state, payload_size)
                }
            };
            frames.push(Message::Payload(PayloadItem::Eof));
            state.phase = Phase::Closed;
            frames
        };

        for frame in frames {
            transport.feed(frame).await?;
        }
        transport.flush().await?;
        Ok(())
    }

    /// Builds the frames that put the head and the buffered body on the wire,
    /// and marks the response as committed.
    fn commit(&self, state: &mut ResponseState, payload_size: PayloadSize) -> Vec<Frame> {
        // the headers stay readable after commit
        let mut headers = state.headers.clone();
        for cookie in &state.cookies {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => warn!(cookie = cookie.name(), cause = %e, "skip cookie which can't be written as header"),
            }
        }
        if self.shared.config.date_header() && !headers.contains_key(header::DATE) {
            if let Some(date) = http_date() {
                headers.insert(header::DATE, date);
            }
        }

        let mut head = Response::new(());
        *head.status_mut() = state.status;
        *head.version_mut() = self.shared.config.version();
        *head.headers_mut() = headers;

        state.phase = Phase::Committed;
        info!(status = %state.status, ?payload_size, "commit response");

        let mut frames = Vec::with_capacity(3);
        frames.push(Message::Header((head, payload_size)));
        let body = state.buffer.split().freeze();
        if !body.is_empty() {
            frames.push(Message::from(body));
        }
        frames
    }

    /// Returns whether a mutation may be applied, honouring the committed policy.
    fn accept_mutation(&self, state: &ResponseState, operation: &'static str) -> Result<bool, ResponseError> {
        if state.phase == Phase::Open {
            return Ok(true);
        }
        match self.shared.config.committed_policy() {
            CommittedPolicy::Ignore => {
                warn!(operation, "response has been committed, ignore the mutation");
                Ok(false)
            }
            CommittedPolicy::Reject => Err(ResponseError::Committed),
        }
    }

    fn mutate_headers<F>(&self, name: &str, operation: &'static str, f: F) -> Result<(), ResponseError>
    where
        F: FnOnce(&mut HeaderMap, HeaderName),
    {
        let name = parse_header_name(name)?;
        let mut state = self.state();
        if self.accept_mutation(&state, operation)? {
            f(&mut state.headers, name);
        }
        Ok(())
    }
}

impl<W> BufferedResponse<W> {
    pub fn config(&self) -> &ContainerConfig {
        &self.shared.config
    }

    /// Cookies attached so far, in the order they were added.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.state().cookies.clone()
    }

    /// Returns the transport once no other handle to this response is alive.
    pub fn into_inner(self) -> Result<W, Self> {
        match Arc::try_unwrap(self.shared) {
            Ok(shared) => Ok(shared.transport.into_inner().into_inner()),
            Err(shared) => Err(Self { shared }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ResponseState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> Clone for BufferedResponse<W> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<W> Debug for BufferedResponse<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("BufferedResponse")
            .field("status", &state.status)
            .field("headers", &state.headers)
            .field("buffered", &state.buffer.len())
            .field("phase", &state.phase)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<W> ContainerResponse for BufferedResponse<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    type Output = ResponseOutput<W>;

    fn set_status(&self, status: u16) -> Result<bool, ResponseError> {
        let Ok(status) = StatusCode::from_u16(status) else {
            return Err(ResponseError::InvalidStatus(status));
        };
        let mut state = self.state();
        let applied = self.accept_mutation(&state, "set_status")?;
        if applied {
            state.status = status;
        }
        Ok(applied)
    }

    fn status(&self) -> u16 {
        self.state().status.as_u16()
    }

    fn add_header(&self, name: &str, value: HeaderValue) -> Result<(), ResponseError> {
        self.mutate_headers(name, "add_header", |headers, name| {
            headers.append(name, value);
        })
    }

    fn set_header(&self, name: &str, value: HeaderValue) -> Result<(), ResponseError> {
        self.mutate_headers(name, "set_header", |headers, name| {
            headers.insert(name, value);
        })
    }

    fn remove_header(&self, name: &str) -> Result<(), ResponseError> {
        self.mutate_headers(name, "remove_header", |headers, name| {
            headers.remove(name);
        })
    }

    fn header_values(&self, name: &str) -> Vec<HeaderValue> {
        let Ok(name) = parse_header_name(name) else {
            return Vec::new();
        };
        self.state().headers.get_all(name).iter().cloned().collect()
    }

    fn header_names(&self) -> Vec<HeaderName> {
        self.state().headers.keys().cloned().collect()
    }

    fn add_cookie(&self, cookie: Cookie) -> Result<(), ResponseError> {
        cookie.validate()?;
        if let Err(e) = HeaderValue::from_str(&cookie.to_string()) {
            return Err(ResponseError::invalid_header(format!("cookie {}: {e}", cookie.name())));
        }
        let mut state = self.state();
        if self.accept_mutation(&state, "add_cookie")? {
            state.cookies.push(cookie);
        }
        Ok(())
    }

    fn output_stream(&self) -> Result<Self::Output, ResponseError> {
        if self.state().phase == Phase::Closed {
            return Err(ResponseError::Closed);
        }
        Ok(ResponseOutput::new(self.clone()))
    }

    async fn send_error(&self, status: u16, message: Option<String>) -> Result<(), ResponseError> {
        let Ok(status) = StatusCode::from_u16(status) else {
            return Err(ResponseError::InvalidStatus(status));
        };

        let mut transport = self.shared.transport.lock().await;
        let frames = {
            let mut state = self.state();
            if state.phase != Phase::Open {
                warn!(status = %status, "can't send error, response has been committed");
                return Err(ResponseError::Committed);
            }

            // headers and cookies survive, the buffered body does not
            state.status = status;
            state.buffer.clear();
            state.headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
            state.buffer.extend_from_slice(error_page(status, message.as_deref()).as_bytes());

            let payload_size = PayloadSize::of_buffered(state.buffer.len());
            let mut frames = self.commit(&mut state, payload_size);
            frames.push(Message::Payload(PayloadItem::Eof));
            state.phase = Phase::Closed;
            frames
        };

        for frame in frames {
            transport.feed(frame).await?;
        }
        transport.flush().await?;
        Ok(())
    }

    fn is_committed(&self) -> bool {
        self.state().phase != Phase::Open
    }

    fn reset(&self) -> Result<(), ResponseError> {
        let mut state = self.state();
        if state.phase != Phase::Open {
            warn!("can't reset, response has been committed");
            return Err(ResponseError::Committed);
        }
        state.clear();
        debug!("reset response");
        Ok(())
    }

    async fn flush_buffer(&self) -> Result<(), ResponseError> {
        let mut transport = self.shared.transport.lock().await;
        let frames = {
            let mut state = self.state();
            match state.phase {
                Phase::Open => self.commit(&mut state, PayloadSize::Chunked),
                Phase::Committed | Phase::Closed => Vec::new(),
            }
        };

        for frame in frames {
            transport.feed(frame).await?;
        }
        transport.flush().await?;
        Ok(())
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName, ResponseError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ResponseError::invalid_header(format!("{name:?}: {e}")))
}

fn http_date() -> Option<HeaderValue> {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    HeaderValue::from_bytes(&buf[..]).ok()
}

fn error_page(status: StatusCode, message: Option<&str>) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    let message = message.map_or_else(|| reason.to_string(), escape_html);
    format!(
        "<html><head><title>{code} {reason}</title></head><body><h1>HTTP Status {code} - {reason}</h1><p>{message}</p></body></html>"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::OutputStream;
    use indoc::indoc;

    fn response_with(config: ContainerConfig) -> BufferedResponse<Vec<u8>> {
        BufferedResponse::with_config(Vec::new(), config)
    }

    fn response() -> BufferedResponse<Vec<u8>> {
        response_with(ContainerConfig::builder().date_header(false).build())
    }

    fn written(response: BufferedResponse<Vec<u8>>) -> String {
        let bytes = response.into_inner().unwrap();
        String::from_utf8(bytes).unwrap().replace("\r\n", "\n")
    }

    #[tokio::test]
    async fn close_before_commit_writes_content_length() {
        let response = response();
        assert!(response.set_status(201).unwrap());
        response.set_header("content-type", HeaderValue::from_static("text/plain")).unwrap();

        let mut output = response.output_stream().unwrap();
        output.write(b"hello ").await.unwrap();
        output.write(b"world").await.unwrap();
        assert!(!response.is_committed());

        output.close().await.unwrap();
        assert!(response.is_committed());
        drop(output);

        let expected = indoc! {"
            HTTP/1.1 201 Created
            content-type: text/plain
            content-length: 11

            hello world"};
        assert_eq!(written(response), expected);
    }

    #[tokio::test]
    async fn full_buffer_commits_chunked() {
        let response = response_with(ContainerConfig::builder().buffer_size(4).date_header(false).build());

        let mut output = response.output_stream().unwrap();
        output.write(b"ab").await.unwrap();
        assert!(!response.is_committed());

        output.write(b"cdef").await.unwrap();
        assert!(response.is_committed());

        output.write(b"gh").await.unwrap();
        output.close().await.unwrap();
        drop(output);

        let expected = indoc! {"
            HTTP/1.1 200 OK
            transfer-encoding: chunked

            6
            abcdef
            2
            gh
            0

        "};
        assert_eq!(written(response), expected);
    }

    #[tokio::test]
    async fn flush_buffer_commits_empty_body() {
        let response = response();
        response.flush_buffer().await.unwrap();
        assert!(response.is_committed());

        let mut output = response.output_stream().unwrap();
        output.close().await.unwrap();
        drop(output);

        let written = written(response);
        assert!(written.starts_with("HTTP/1.1 200 OK\ntransfer-encoding: chunked\n\n"));
        assert!(written.ends_with("\n\n0\n\n"));
    }

    #[tokio::test]
    async fn cookies_and_date_are_written_at_commit() {
        let response = response_with(ContainerConfig::default());
        let mut cookie = Cookie::new("sid", "abc");
        cookie.set_path("/");
        response.add_cookie(cookie.clone()).unwrap();
        response.add_cookie(Cookie::new("theme", "dark")).unwrap();
        assert_eq!(response.cookies(), vec![cookie, Cookie::new("theme", "dark")]);

        response.output_stream().unwrap().close().await.unwrap();

        let written = written(response);
        assert!(written.contains("set-cookie: sid=abc; Path=/\n"));
        assert!(written.contains("set-cookie: theme=dark\n"));
        assert!(written.contains("date: "));
        assert!(written.contains("content-length: 0\n"));
    }

    #[tokio::test]
    async fn send_error_replaces_body() {
        let response = response();
        response.add_header("x-trace", HeaderValue::from_static("1")).unwrap();

        let mut output = response.output_stream().unwrap();
        output.write(b"partial").await.unwrap();
        drop(output);

        response.send_error(404, Some("no <such> thing".to_string())).await.unwrap();
        assert!(response.is_committed());
        assert_eq!(response.status(), 404);

        let written = written(response);
        assert!(written.starts_with("HTTP/1.1 404 Not Found\n"));
        assert!(written.contains("x-trace: 1\n"));
        assert!(written.contains("content-type: text/html; charset=utf-8\n"));
        assert!(written.contains("<p>no &lt;such&gt; thing</p>"));
        assert!(!written.contains("partial"));
    }

    #[tokio::test]
    async fn send_error_after_commit_fails() {
        let response = response();
        response.flush_buffer().await.unwrap();

        let result = response.send_error(500, None).await;
        assert!(matches!(result, Err(ResponseError::Committed)));
    }

    #[tokio::test]
    async fn reset_clears_open_response_only() {
        let response = response();
        response.set_status(418).unwrap();
        response.add_header("x-a", HeaderValue::from_static("1")).unwrap();
        response.add_cookie(Cookie::new("a", "b")).unwrap();
        response.output_stream().unwrap().write(b"body").await.unwrap();

        response.reset().unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.header_names().is_empty());
        assert!(response.cookies().is_empty());

        response.flush_buffer().await.unwrap();
        assert!(matches!(response.reset(), Err(ResponseError::Committed)));

        let written = written(response);
        assert!(!written.contains("body"));
    }

    #[tokio::test]
    async fn committed_mutation_follows_policy() {
        let ignore = response();
        ignore.flush_buffer().await.unwrap();
        assert!(!ignore.set_status(500).unwrap());
        ignore.add_header("x-late", HeaderValue::from_static("1")).unwrap();
        assert_eq!(ignore.status(), 200);
        assert!(ignore.header_values("x-late").is_empty());

        let reject = response_with(ContainerConfig::builder().committed_policy(CommittedPolicy::Reject).build());
        reject.flush_buffer().await.unwrap();
        assert!(matches!(reject.set_status(500), Err(ResponseError::Committed)));
        assert!(matches!(reject.add_cookie(Cookie::new("a", "b")), Err(ResponseError::Committed)));
        assert_eq!(reject.status(), 200);
    }

    #[test]
    fn reject_malformed_status_and_header() {
        let response = response();

        assert!(matches!(response.set_status(42), Err(ResponseError::InvalidStatus(42))));
        assert!(matches!(
            response.add_header("bad header", HeaderValue::from_static("1")),
            Err(ResponseError::InvalidHeader { .. })
        ));
        assert!(matches!(response.add_cookie(Cookie::new("a", "line\nbreak")), Err(ResponseError::InvalidHeader { .. })));
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn header_values_keep_insertion_order() {
        let response = response();
        response.add_header("Vary", HeaderValue::from_static("accept")).unwrap();
        response.add_header("vary", HeaderValue::from_static("origin")).unwrap();
        assert_eq!(response.header_values("VARY"), vec!["accept", "origin"]);

        response.set_header("vary", HeaderValue::from_static("*")).unwrap();
        assert_eq!(response.header_values("vary"), vec!["*"]);

        response.remove_header("vary").unwrap();
        assert!(response.header_values("vary").is_empty());
        assert!(response.header_values("not a header").is_empty());
    }

    #[tokio::test]
    async fn cookie_attributes_can_not_be_injected() {
        let response = response();
        let mut cookie = Cookie::new("sid", "x");
        cookie.set_path("/; Domain=evil.com");

        assert!(matches!(response.add_cookie(cookie), Err(ResponseError::InvalidHeader { .. })));
        assert!(matches!(response.add_cookie(Cookie::new("s id", "x")), Err(ResponseError::InvalidHeader { .. })));
        assert!(response.cookies().is_empty());

        response.output_stream().unwrap().close().await.unwrap();
        assert!(!written(response).contains("set-cookie"));
    }

    #[tokio::test]
    async fn write_after_close_fails() {
        let response = response();
        let mut output = response.output_stream().unwrap();
        output.close().await.unwrap();

        assert!(matches!(output.write(b"late").await, Err(ResponseError::Closed)));
        // closing twice is fine
        output.close().await.unwrap();
        assert!(matches!(response.output_stream(), Err(ResponseError::Closed)));
    }
}
