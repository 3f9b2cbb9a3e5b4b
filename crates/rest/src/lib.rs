//! The framework-facing half of micro-rest.
//!
//! This crate holds the two things a resource layer needs around message bodies:
//!
//! - a [`ConversionContext`] describing one body conversion (target type, annotations,
//!   media type, headers and free-form properties)
//! - an [`HttpResponse`] abstraction, implemented by [`ContainerResponseAdapter`] on top of a
//!   [`micro_container`] response
//!
//! # Example
//!
//! ```no_run
//! use micro_container::response::{BufferedResponse, OutputStream};
//! use micro_rest::response::{ContainerResponseAdapter, HttpResponse};
//! use micro_rest::{ConversionContext, NewCookie};
//!
//! # async fn serve(stream: tokio::net::TcpStream) -> Result<(), micro_rest::RestError> {
//! let mut context = ConversionContext::new::<String>();
//! context.set_media_type(Some(mime::TEXT_PLAIN_UTF_8));
//!
//! let mut response = ContainerResponseAdapter::new(BufferedResponse::new(stream));
//! response.set_status(200)?;
//! if let Some(media_type) = context.media_type() {
//!     response.output_headers().put_single("content-type", media_type)?;
//! }
//! response.add_new_cookie(&NewCookie::new("sid", "42").with_path("/"))?;
//!
//! let mut output = response.output_stream()?;
//! output.write(b"hello world").await?;
//! output.close().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod cookie;
mod error;
mod header_delegate;

pub mod response;

pub use context::Annotation;
pub use context::ConversionContext;
pub use context::ConversionContextBuilder;
pub use context::Properties;
pub use context::TypeInfo;
pub use cookie::NewCookie;
pub use cookie::DEFAULT_MAX_AGE;
pub use cookie::DEFAULT_VERSION;
pub use error::RestError;
pub use header_delegate::ToHeaderValue;
