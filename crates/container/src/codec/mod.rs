//! Encoders that write a committed container response onto the transport.
//!
//! A response is written as a stream of [`Message`](crate::protocol::Message)s: one
//! head, followed by payload items terminated by an EOF marker.
//!
//! - [`ResponseEncoder`]: drives the head encoder, then the payload encoder matching
//!   the announced [`PayloadSize`](crate::protocol::PayloadSize)
//! - Head encoding via the [`header`] module
//! - Payload encoding via the [`body`] module, fixed length or chunked
//!
//! # Example
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use http::Response;
//! use micro_container::codec::ResponseEncoder;
//! use micro_container::protocol::{Message, PayloadItem, PayloadSize};
//! use tokio_util::codec::Encoder;
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut dst = BytesMut::new();
//!
//! let head = Response::builder().status(200).body(()).unwrap();
//! encoder.encode(Message::Header((head, PayloadSize::Length(2))), &mut dst).unwrap();
//! encoder.encode(Message::Payload(PayloadItem::Chunk(Bytes::from_static(b"ok"))), &mut dst).unwrap();
//! encoder.encode(Message::Payload(PayloadItem::Eof), &mut dst).unwrap();
//!
//! assert!(dst.ends_with(b"\r\n\r\nok"));
//! ```

mod body;
mod header;
mod response_encoder;

pub use response_encoder::ResponseEncoder;
