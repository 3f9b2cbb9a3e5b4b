//! Response body framing.
//!
//! - [`ChunkedEncoder`](chunked_encoder::ChunkedEncoder): chunked transfer encoding,
//!   used when the response is committed before the body is complete
//! - [`LengthEncoder`](length_encoder::LengthEncoder): identity body with a known length
//! - [`PayloadEncoder`]: picks one of the above per response

mod chunked_encoder;
mod length_encoder;
mod payload_encoder;

pub use payload_encoder::PayloadEncoder;
