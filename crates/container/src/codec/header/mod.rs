//! Response head serialization.
//!
//! - [`HeaderEncoder`]: writes the status line and header fields, and keeps the
//!   `Content-Length` / `Transfer-Encoding` headers consistent with the payload size

mod header_encoder;

pub use header_encoder::HeaderEncoder;
