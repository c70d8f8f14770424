//! HTTP response building module
//!
//! Turns a resource and a [`RangeOutcome`] into a [`Reply`], and renders
//! replies as hyper responses at the server edge.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::range::{ByteWindow, RangeOutcome};
use crate::resources::Resource;

/// Transport-agnostic response: status, ordered headers and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: Bytes,
}

impl Reply {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Render as a hyper response; HEAD requests keep the headers but drop the body
    pub fn into_response(self, is_head: bool) -> Response<Full<Bytes>> {
        let status = self.status;
        let body = if is_head { Bytes::new() } else { self.body };

        let builder = self
            .headers
            .into_iter()
            .fold(Response::builder().status(status), |builder, (name, value)| {
                builder.header(name, value)
            });

        builder.body(Full::new(body)).unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

/// Build the reply for a resource given the parsed Range outcome
pub fn build_reply(resource: &Resource, outcome: RangeOutcome) -> Reply {
    match outcome {
        RangeOutcome::NoRangeRequested => build_full_reply(resource),
        RangeOutcome::Satisfiable(window) => build_partial_reply(resource, window),
        RangeOutcome::Unsatisfiable => build_416_reply(resource.len()),
    }
}

/// Build 200 OK with the full content
pub fn build_full_reply(resource: &Resource) -> Reply {
    Reply::new(StatusCode::OK)
        .header("Content-Type", resource.media_type())
        .header("Accept-Ranges", "bytes")
        .header("Content-Length", resource.len())
        .body(resource.content().clone())
}

/// Build 206 Partial Content for an already-validated window
///
/// # Panics
///
/// Panics if `window` does not satisfy `start <= end < resource.len()`.
/// Windows produced by the range parser always do.
pub fn build_partial_reply(resource: &Resource, window: ByteWindow) -> Reply {
    let ByteWindow { start, end } = window;
    let total_size = resource.len();

    Reply::new(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", resource.media_type())
        .header("Accept-Ranges", "bytes")
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Content-Length", window.span())
        .body(resource.content().slice(start..=end))
}

/// Build 416 Range Not Satisfiable
pub fn build_416_reply(total_size: usize) -> Reply {
    Reply::new(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Range", format!("bytes */{total_size}"))
}

/// Build 404 Not Found naming the requested path
pub fn build_404_reply(path: &str) -> Reply {
    let message = format!("Not found: {path}");
    Reply::new(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain")
        .header("Content-Length", message.len())
        .body(Bytes::from(message))
}

/// Build 405 Method Not Allowed
pub fn build_405_reply() -> Reply {
    let message = "405 Method Not Allowed";
    Reply::new(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .header("Content-Length", message.len())
        .body(Bytes::from_static(message.as_bytes()))
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
