use std::collections::HashMap;

use thiserror::Error;

use crate::http::request::{Method, Request, Version};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request")]
    InvalidRequest,
    #[error("request line has no version token")]
    MissingVersion,
    #[error("unsupported HTTP version {0:?}")]
    UnsupportedVersion(String),
    #[error("request target must start with '/'")]
    InvalidTarget,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("missing Content-Length")]
    MissingContentLength,
    #[error("invalid Content-Length {0:?}")]
    InvalidContentLength(String),
    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),
}

/// Parses the buffered start of a request.
///
/// The head ends at the first blank line; bytes after it are kept as the
/// buffered body. When no blank line is present (the peer closed early) the
/// whole buffer is treated as the head.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let (header_bytes, body_bytes) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + 4..]),
        None => (buf, &buf[buf.len()..]),
    };

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method, target, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;

        headers
            .entry(key.trim().to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    Ok(Request {
        method,
        target,
        version,
        headers,
        body: body_bytes.to_vec(),
    })
}

/// Splits `METHOD SP TARGET SP VERSION`.
///
/// The version is checked first so an unsupported version is reported even
/// when the rest of the line is odd.
fn parse_request_line(line: &str) -> Result<(Method, String, Version), ParseError> {
    let mut parts = line.splitn(3, ' ');

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::MissingVersion)?;
    let version = parts.next().ok_or(ParseError::MissingVersion)?;

    let version = Version::parse(version.trim_end())?;

    if method.is_empty() {
        return Err(ParseError::InvalidRequest);
    }
    if !target.starts_with('/') {
        return Err(ParseError::InvalidTarget);
    }

    Ok((Method::from_token(method), target.to_string(), version))
}

pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
