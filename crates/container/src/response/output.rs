use crate::protocol::ResponseError;
use crate::response::{BufferedResponse, ContainerResponse, OutputStream};
use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// The body stream of a [`BufferedResponse`].
///
/// Writes land in the response buffer until the response is committed, after that
/// they go to the transport as body chunks.
#[derive(Debug)]
pub struct ResponseOutput<W> {
    response: BufferedResponse<W>,
}

impl<W> ResponseOutput<W> {
    pub(crate) fn new(response: BufferedResponse<W>) -> Self {
        Self { response }
    }
}

#[async_trait]
impl<W> OutputStream for ResponseOutput<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn write(&mut self, buf: &[u8]) -> Result<(), ResponseError> {
        self.response.write_body(buf).await
    }

    async fn flush(&mut self) -> Result<(), ResponseError> {
        self.response.flush_buffer().await
    }

    async fn close(&mut self) -> Result<(), ResponseError> {
        self.response.close().await
    }
}
