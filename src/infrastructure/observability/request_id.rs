use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const SESSIONS_PATH: &str = "/api/v1/sessions/";

/// Propagates or mints an `x-request-id` and scopes the request's logs to it.
///
/// Requests addressed to a session also carry its id on the span, so one
/// conversation can be followed across uploads and questions.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        session_id = session_segment(request.uri().path()).unwrap_or("-"),
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(e) => tracing::debug!(error = %e, "Request id is not a valid header value"),
    }

    response
}

fn incoming_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn session_segment(path: &str) -> Option<&str> {
    path.strip_prefix(SESSIONS_PATH)?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
