use futures::StreamExt;
use log::info;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;

use crate::error::ConnectionError;
use crate::request::{Request, RequestLineCodec};
use crate::resolver::Resolver;

pub const BAD_REQUEST: &[u8] = b"HTTP 400 Bad Request\n";

/// Serves the one request carried by `stream`, then shuts the stream down.
///
/// Errors are returned after the connection has been dealt with; the caller
/// only logs them.
pub async fn handle_connection<S>(
    stream: S,
    resolver: &Resolver,
    max_request_line: usize,
) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, RequestLineCodec::new(max_request_line));

    let line = match lines.next().await {
        Some(line) => line?,
        None => return Err(ConnectionError::EmptyRequest),
    };

    let request = match Request::from_line(&line) {
        Ok(request) => request,
        Err(err) => {
            writer.write_all(BAD_REQUEST).await?;
            writer.shutdown().await?;
            return Err(err);
        }
    };

    match request.verb.as_str() {
        "GET" => {
            info!("serving {}", request.path);
            let served = serve_get(&mut writer, resolver, &request.path).await;
            let shutdown = writer.shutdown().await;
            served?;
            Ok(shutdown?)
        }
        _ => Err(ConnectionError::UnknownVerb {
            verb: request.verb,
            line,
        }),
    }
}

async fn serve_get<W>(writer: &mut W, resolver: &Resolver, path: &str) -> Result<(), ConnectionError>
where
    W: AsyncWrite + Unpin,
{
    let mut response = resolver.resolve(path).await;
    let written = response.write_to(writer).await;
    let closed = response.close().await;

    let written = written?;
    info!("wrote {} bytes", written);
    closed?;
    Ok(())
}
