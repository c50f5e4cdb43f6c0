use std::collections::HashMap;
use std::fmt;

use crate::http::parser::ParseError;

/// HTTP request methods.
///
/// Only GET and POST are served. Anything else is kept verbatim so the
/// dispatcher can report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Download a file
    GET,
    /// POST - Log in or upload a file
    POST,
    /// Any other token found in the request line
    Other(String),
}

impl Method {
    /// Parses an HTTP method token. Case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use cubby::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Other("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }
}

/// The two protocol versions the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    Http10,
    #[default]
    Http11,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }

    /// Parses a version token from the request line.
    ///
    /// Tokens that look like HTTP but name another version are reported as
    /// unsupported rather than malformed.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        match token {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            t if t.starts_with("HTTP/") => Err(ParseError::UnsupportedVersion(t.to_string())),
            _ => Err(ParseError::MissingVersion),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request head plus whatever body bytes arrived with it.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, ...)
    pub method: Method,
    /// The raw request target, always starting with `/`
    pub target: String,
    /// HTTP version
    pub version: Version,
    /// Request headers. Lookup is case-sensitive and the first occurrence of
    /// a name wins.
    pub headers: HashMap<String, String>,
    /// Body bytes received together with the head. May be shorter than the
    /// declared `Content-Length`.
    pub body: Vec<u8>,
}

impl Request {
    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Declared body length.
    ///
    /// A missing or non-numeric `Content-Length` is an error; callers treat it
    /// as a bad request.
    pub fn content_length(&self) -> Result<usize, ParseError> {
        let raw = self
            .header("Content-Length")
            .ok_or(ParseError::MissingContentLength)?;
        raw.parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))
    }

    /// Whether the client waits for `100 Continue` before sending the body.
    pub fn expects_continue(&self) -> bool {
        self.header("Expect")
            .map(|v| v.eq_ignore_ascii_case("100-continue"))
            .unwrap_or(false)
    }

    /// Whether the target addresses the login endpoint.
    pub fn is_login(&self) -> bool {
        self.target.starts_with("/login?")
    }
}
