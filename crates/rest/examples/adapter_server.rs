//! Serves every connection through a `ContainerResponseAdapter`.
//!
//! The request itself is read once and ignored, paths ending in `/missing` get an error
//! page, everything else a plain text greeting with a session cookie.
//!
//! curl -v http://127.0.0.1:8080/
//! curl -v http://127.0.0.1:8080/missing

use micro_container::config::ContainerConfig;
use micro_container::response::{BufferedResponse, OutputStream};
use micro_rest::response::{ContainerResponseAdapter, HttpResponse};
use micro_rest::{ConversionContext, NewCookie, RestError};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            let (mut reader, writer) = tcp_stream.into_split();

            let mut request = vec![0_u8; 4096];
            let missing = match reader.read(&mut request).await {
                Ok(n) => String::from_utf8_lossy(&request[..n]).lines().next().is_some_and(|line| line.contains("/missing ")),
                Err(e) => {
                    warn!(cause = %e, "failed to read request");
                    return;
                }
            };

            let config = ContainerConfig::builder().buffer_size(1024).build();
            let response = ContainerResponseAdapter::new(BufferedResponse::with_config(writer, config));
            match serve(response, missing).await {
                Ok(()) => info!("finished process, connection shutdown"),
                Err(e) => error!(cause = %e, "service has error, connection shutdown"),
            }
        });
    }
}

async fn serve(mut response: ContainerResponseAdapter<BufferedResponse<OwnedWriteHalf>>, missing: bool) -> Result<(), RestError> {
    if missing {
        return response.send_error_with_message(404, "nothing lives here").await;
    }

    let mut context = ConversionContext::new::<String>();
    context.set_media_type(Some(mime::TEXT_PLAIN_UTF_8));

    response.set_status(200)?;
    let headers = response.output_headers();
    if let Some(media_type) = context.media_type() {
        headers.put_single("content-type", media_type)?;
    }
    headers.add("x-served-by", "micro-rest")?;
    response.add_new_cookie(&NewCookie::new("sid", "42").with_path("/").with_http_only(true))?;

    let mut output = response.output_stream()?;
    output.write(b"hello from micro-rest\r\n").await?;
    output.close().await?;
    Ok(())
}
