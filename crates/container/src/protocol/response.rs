//! HTTP response head handling.
//!
//! The head of a committed response is represented with the standard `http::Response`
//! type and an empty body placeholder; the body is streamed separately as payload items.

use http::Response;

/// Type alias for HTTP response headers.
///
/// Uses `http::Response<()>` with an empty body placeholder, the body is written
/// after the head once the response is committed.
pub type ResponseHead = Response<()>;
