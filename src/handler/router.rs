//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! resource lookup and range negotiation.

use crate::config::AppState;
use crate::http::{self, RangePolicy, Reply};
use crate::logger::{self, AccessLogEntry};
use crate::resources::ResourceTable;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Resolve a path against the table with the default range policy
///
/// # Examples
/// ```
/// use range_fixture::handler::dispatch;
/// use range_fixture::resources::ResourceTable;
///
/// let table = ResourceTable::fixtures();
/// let reply = dispatch(&table, "/status", None);
/// assert_eq!(reply.status, 200);
/// assert_eq!(&reply.body[..], b"OK");
/// ```
pub fn dispatch(table: &ResourceTable, path: &str, range_header: Option<&str>) -> Reply {
    dispatch_with_policy(table, path, range_header, RangePolicy::default())
}

/// Resolve a path against the table: range-aware reply on hit, 404 on miss
pub fn dispatch_with_policy(
    table: &ResourceTable,
    path: &str,
    range_header: Option<&str>,
    policy: RangePolicy,
) -> Reply {
    match table.lookup(path) {
        Some(resource) => {
            let outcome = http::parse_range_header_with(range_header, resource.len(), policy);
            http::build_reply(resource, outcome)
        }
        None => http::build_404_reply(path),
    }
}

/// Main entry point for HTTP request handling
///
/// Lookup uses the raw request target, query string included. The request
/// body is never read, so any body type is accepted.
#[allow(clippy::unused_async)]
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let path = req.uri().path();
    let target = req.uri().path_and_query().map_or(path, |pq| pq.as_str());
    let is_head = *method == Method::HEAD;
    let range_header = header_str(&req, RANGE);

    let reply = match *method {
        Method::GET | Method::HEAD => {
            dispatch_with_policy(&state.resources, target, range_header, state.range_policy)
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {target}"));
            http::build_405_reply()
        }
    };

    if state.access_log {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.to_string());
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = http_version(req.version()).to_string();
        entry.status = reply.status.as_u16();
        entry.body_bytes = if is_head { 0 } else { reply.body.len() };
        entry.range = range_header.map(ToString::to_string);
        entry.referer = header_str(&req, REFERER).map(ToString::to_string);
        entry.user_agent = header_str(&req, USER_AGENT).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(reply.into_response(is_head))
}

/// Header value as text; non-ASCII values count as absent
fn header_str<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

const fn http_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resources::{CSV_DATA, GREETING};
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn state(policy: RangePolicy) -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist/fixture").unwrap();
        config.logging.access_log = false;
        config.http.start_past_end = policy;
        Arc::new(AppState::new(&config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(
        state: Arc<AppState>,
        method: Method,
        uri: &str,
        range: Option<&str>,
    ) -> (StatusCode, hyper::http::HeaderMap, Bytes) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(range) = range {
            builder = builder.header("Range", range);
        }
        let req = builder.body(()).unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        let (parts, body) = resp.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        (parts.status, parts.headers, body)
    }

    fn header<'a>(headers: &'a hyper::http::HeaderMap, name: &str) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_status_full_content() {
        let reply = dispatch(&ResourceTable::fixtures(), "/status", None);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(&reply.body[..], b"OK");
        assert_eq!(reply.header_value("Content-Length"), Some("2"));
        assert_eq!(reply.header_value("Accept-Ranges"), Some("bytes"));
    }

    #[test]
    fn test_csv_prefix_range() {
        let reply = dispatch(&ResourceTable::fixtures(), "/data.csv", Some("bytes=0-10"));
        assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&reply.body[..], b"id,name,cit");
        let expected = format!("bytes 0-10/{}", CSV_DATA.len());
        assert_eq!(reply.header_value("Content-Range"), Some(expected.as_str()));
    }

    #[test]
    fn test_csv_end_clamped() {
        let reply = dispatch(&ResourceTable::fixtures(), "/data.csv", Some("bytes=5-999999"));
        let last = CSV_DATA.len() - 1;
        assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&reply.body[..], &CSV_DATA.as_bytes()[5..]);
        let expected = format!("bytes 5-{last}/{}", CSV_DATA.len());
        assert_eq!(reply.header_value("Content-Range"), Some(expected.as_str()));
    }

    #[test]
    fn test_open_ended_range_runs_to_last_byte() {
        let reply = dispatch(&ResourceTable::fixtures(), "/", Some("bytes=6-"));
        assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&reply.body[..], b"from service");
        let expected = format!("bytes 6-{}/{}", GREETING.len() - 1, GREETING.len());
        assert_eq!(reply.header_value("Content-Range"), Some(expected.as_str()));
    }

    #[test]
    fn test_start_past_end_is_unsatisfiable() {
        let reply = dispatch(&ResourceTable::fixtures(), "/", Some("bytes=1000-2000"));
        assert_eq!(reply.status, StatusCode::RANGE_NOT_SATISFIABLE);
        assert!(reply.body.is_empty());
        let expected = format!("bytes */{}", GREETING.len());
        assert_eq!(reply.header_value("Content-Range"), Some(expected.as_str()));
    }

    #[test]
    fn test_start_past_end_collapse_serves_first_byte() {
        let reply = dispatch_with_policy(
            &ResourceTable::fixtures(),
            "/",
            Some("bytes=1000-2000"),
            RangePolicy::Collapse,
        );
        assert_eq!(reply.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&reply.body[..], b"H");
        let expected = format!("bytes 0-0/{}", GREETING.len());
        assert_eq!(reply.header_value("Content-Range"), Some(expected.as_str()));
    }

    #[test]
    fn test_malformed_range_serves_full_content() {
        let reply = dispatch(&ResourceTable::fixtures(), "/status", Some("bytes=-1"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(&reply.body[..], b"OK");
    }

    #[test]
    fn test_unknown_path() {
        let reply = dispatch(&ResourceTable::fixtures(), "/nope", Some("bytes=0-1"));
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(&reply.body[..], b"Not found: /nope");
        assert_eq!(reply.header_value("Content-Type"), Some("text/plain"));
        assert_eq!(reply.header_value("Content-Length"), Some("16"));
    }

    #[tokio::test]
    async fn test_handle_get_range() {
        let (status, headers, body) = send(
            state(RangePolicy::Unsatisfiable),
            Method::GET,
            "/data.csv",
            Some("bytes=0-10"),
        )
        .await;
        assert_eq!(status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&body[..], b"id,name,cit");
        assert_eq!(header(&headers, "content-length"), Some("11"));
        assert_eq!(header(&headers, "content-type"), Some("text/csv"));
    }

    #[tokio::test]
    async fn test_handle_query_string_is_part_of_the_path() {
        let (status, _, body) = send(
            state(RangePolicy::Unsatisfiable),
            Method::GET,
            "/data.csv?v=1",
            Some("bytes=0-10"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"Not found: /data.csv?v=1");
    }

    #[tokio::test]
    async fn test_handle_not_found_echoes_query() {
        let (status, headers, body) = send(
            state(RangePolicy::Unsatisfiable),
            Method::GET,
            "/nope?x=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"Not found: /nope?x=1");
        assert_eq!(header(&headers, "content-length"), Some("20"));
    }

    #[tokio::test]
    async fn test_handle_head_has_headers_without_body() {
        let (status, headers, body) = send(
            state(RangePolicy::Unsatisfiable),
            Method::HEAD,
            "/data.csv",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        let expected = CSV_DATA.len().to_string();
        assert_eq!(header(&headers, "content-length"), Some(expected.as_str()));
        assert_eq!(header(&headers, "accept-ranges"), Some("bytes"));
    }

    #[tokio::test]
    async fn test_handle_method_not_allowed() {
        let (status, headers, _) = send(
            state(RangePolicy::Unsatisfiable),
            Method::POST,
            "/status",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&headers, "allow"), Some("GET, HEAD"));
    }

    #[tokio::test]
    async fn test_handle_uses_configured_policy() {
        let (status, _, body) = send(
            state(RangePolicy::Collapse),
            Method::GET,
            "/",
            Some("bytes=1000-2000"),
        )
        .await;
        assert_eq!(status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(&body[..], b"H");
    }
}
