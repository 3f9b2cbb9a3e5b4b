//! A buffered HTTP/1.1 response container
//!
//! This crate provides the response side of an HTTP container: the response object a
//! container hands to the framework above it, and the machinery that turns it into
//! bytes on a transport once it is committed.
//!
//! # Example
//!
//! ```no_run
//! use http::HeaderValue;
//! use micro_container::protocol::Cookie;
//! use micro_container::response::{BufferedResponse, ContainerResponse, OutputStream};
//! use tokio::net::TcpStream;
//!
//! # async fn serve(stream: TcpStream) -> Result<(), micro_container::protocol::ResponseError> {
//! let (_reader, writer) = stream.into_split();
//! let response = BufferedResponse::new(writer);
//!
//! response.set_status(200)?;
//! response.set_header("content-type", HeaderValue::from_static("text/plain"))?;
//! response.add_cookie(Cookie::new("visited", "1"))?;
//!
//! let mut output = response.output_stream()?;
//! output.write(b"Hello World!\r\n").await?;
//! output.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`response`]: the [`response::ContainerResponse`] contract and [`response::BufferedResponse`]
//! - [`protocol`]: response head, payload frames, cookies and errors
//! - [`codec`]: encoders writing a committed response onto the transport
//! - [`config`]: buffer size, committed-response policy, date header
//!
//! # Commit
//!
//! A response is committed when its head is written. Until then status, headers and
//! cookies can be changed freely and the whole response can be reset. After commit:
//!
//! - `reset` and `send_error` fail with [`protocol::ResponseError::Committed`]
//! - status, header and cookie mutations follow [`config::CommittedPolicy`]
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 status lines only
//! - No connection management, the transport is owned by the caller

pub mod codec;
pub mod config;
pub mod protocol;
pub mod response;
