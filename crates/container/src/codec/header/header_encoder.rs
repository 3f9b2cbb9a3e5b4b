//! Serializes the head of a committed response.
//!
//! Writes the status line and every header field, and rewrites the framing headers
//! so they agree with the [`PayloadSize`] chosen at commit time:
//!
//! - `Length(n)`: `Content-Length: n`, any `Transfer-Encoding` dropped
//! - `Chunked`: `Transfer-Encoding: chunked`, any `Content-Length` dropped
//! - `Empty`: `Content-Length: 0`

use crate::protocol::{PayloadSize, ResponseHead, SendError};

use bytes::{BufMut, BytesMut};

use http::{HeaderValue, Version, header};
use std::io;
use std::io::{ErrorKind, Write};
use tokio_util::codec::Encoder;
use tracing::error;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

const CHUNKED_VALUE: HeaderValue = HeaderValue::from_static("chunked");
const ZERO_VALUE: HeaderValue = HeaderValue::from_static("0");

/// Encoder for the response head, see the module docs for the framing rules.
#[derive(Debug, Default)]
pub struct HeaderEncoder;

impl Encoder<(ResponseHead, PayloadSize)> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (ResponseHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut header, payload_size) = item;

        dst.reserve(INIT_HEADER_SIZE);
        let version = match header.version() {
            Version::HTTP_11 => "HTTP/1.1",
            Version::HTTP_10 => "HTTP/1.0",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(io::Error::from(ErrorKind::Unsupported).into());
            }
        };

        // unregistered codes have no canonical reason, the reason phrase may be empty
        let status = header.status();
        write!(FastWrite(dst), "{} {} {}\r\n", version, status.as_str(), status.canonical_reason().unwrap_or(""))?;

        let headers = header.headers_mut();
        match payload_size {
            PayloadSize::Length(n) => {
                headers.remove(header::TRANSFER_ENCODING);
                headers.insert(header::CONTENT_LENGTH, n.into());
            }
            PayloadSize::Chunked => {
                headers.remove(header::CONTENT_LENGTH);
                headers.insert(header::TRANSFER_ENCODING, CHUNKED_VALUE);
            }
            PayloadSize::Empty => {
                headers.remove(header::TRANSFER_ENCODING);
                headers.insert(header::CONTENT_LENGTH, ZERO_VALUE);
            }
        }

        for (header_name, header_value) in header.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writer over `BytesMut`, the buffer has already been reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Response;
    use indoc::indoc;

    fn encode(head: ResponseHead, payload_size: PayloadSize) -> String {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode((head, payload_size), &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap().replace("\r\n", "\n")
    }

    #[test]
    fn encode_length_head() {
        let head = Response::builder().status(201).header(header::CONTENT_TYPE, "text/plain").body(()).unwrap();

        let expected = indoc! {"
            HTTP/1.1 201 Created
            content-type: text/plain
            content-length: 5

        "};
        assert_eq!(encode(head, PayloadSize::Length(5)), expected);
    }

    #[test]
    fn chunked_head_drops_content_length() {
        let head = Response::builder().header(header::CONTENT_LENGTH, "10").body(()).unwrap();

        let expected = indoc! {"
            HTTP/1.1 200 OK
            transfer-encoding: chunked

        "};
        assert_eq!(encode(head, PayloadSize::Chunked), expected);
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let head = Response::builder().status(599).version(Version::HTTP_10).body(()).unwrap();

        let encoded = encode(head, PayloadSize::Empty);
        assert!(encoded.starts_with("HTTP/1.0 599 \n"));
        assert!(encoded.contains("content-length: 0\n"));
    }

    #[test]
    fn http2_is_unsupported() {
        let head = Response::builder().version(Version::HTTP_2).body(()).unwrap();
        let mut dst = BytesMut::new();

        assert!(HeaderEncoder.encode((head, PayloadSize::Empty), &mut dst).is_err());
    }
}
