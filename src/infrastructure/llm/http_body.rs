use std::time::Duration;

use futures::stream::{Stream, StreamExt};
use reqwest::{Response, StatusCode};

use crate::application::ports::LlmClientError;

pub(super) const STREAM_TRUNCATED: &str = "stream ended before done";

/// Maps non-success statuses to client errors, keeping the body for context.
pub(super) async fn ensure_success(response: Response) -> Result<Response, LlmClientError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmClientError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmClientError::ApiRequestFailed(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    Ok(response)
}

/// Splits a streamed body into complete lines.
///
/// Network chunks do not respect line boundaries, so partial lines are
/// buffered until their newline arrives. A trailing unterminated line is
/// emitted when the body ends. A server that goes quiet for longer than
/// `idle_timeout` between chunks ends the stream with `Timeout`.
pub(super) fn body_lines(
    response: Response,
    idle_timeout: Duration,
) -> impl Stream<Item = Result<String, LlmClientError>> + Send + 'static {
    let mut bytes = response.bytes_stream();

    async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            let chunk = match tokio::time::timeout(idle_timeout, bytes.next()).await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(_) => {
                    yield Err(LlmClientError::Timeout);
                    return;
                }
            };
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(LlmClientError::from(e));
                    return;
                }
            };
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim_end_matches(['\r', '\n']);
                if !line.is_empty() {
                    yield Ok(line.to_string());
                }
            }
        }

        let rest = String::from_utf8_lossy(&buffer);
        let rest = rest.trim();
        if !rest.is_empty() {
            yield Ok(rest.to_string());
        }
    }
}
