use crate::http::request::Version;

/// HTTP status codes produced by the server.
///
/// - `Continue` (100): interim reply before an upload body
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request
/// - `Unauthorized` (401): Missing or invalid credentials/session
/// - `NotFound` (404): File not found
/// - `MethodNotAllowed` (405): Neither GET nor POST
/// - `InternalServerError` (500): Local resource failure
/// - `HttpVersionNotSupported` (505): Anything but HTTP/1.0 and HTTP/1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 100 Continue
    Continue,
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use cubby::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Unauthorized.as_u16(), 401);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Continue => 100,
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// A complete response ready to be serialized.
///
/// Headers keep insertion order so the wire output is deterministic.
#[derive(Debug)]
pub struct Response {
    /// Version echoed in the status line
    pub version: Version,
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in write order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .version(Version::Http10)
///     .header("Set-Cookie", "blarg=1; HttpOnly;")
///     .body(b"Successfully logged in!\r\n".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    version: Version,
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    close: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: Version::default(),
            status,
            headers: Vec::new(),
            body: Vec::new(),
            close: true,
        }
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Omits the `Connection: Closed` header. Only interim responses use this.
    pub fn interim(mut self) -> Self {
        self.close = false;
        self
    }

    /// Builds the final Response.
    ///
    /// Every final response announces `Connection: Closed`; the server never
    /// keeps a connection alive.
    pub fn build(self) -> Response {
        let mut headers = self.headers;
        if self.close && !headers.iter().any(|(k, _)| k == "Connection") {
            headers.push(("Connection".to_string(), "Closed".to_string()));
        }

        Response {
            version: self.version,
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with the given body.
    pub fn ok(version: Version, body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .version(version)
            .body(body.into())
            .build()
    }

    /// Header block that precedes a streamed download.
    pub fn stream_head(version: Version) -> Self {
        ResponseBuilder::new(StatusCode::Ok).version(version).build()
    }

    pub fn login_ok(version: Version, cookie_name: &str, token: &str) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .version(version)
            .header("Set-Cookie", format!("{}={}; HttpOnly;", cookie_name, token))
            .body(b"Successfully logged in!\r\n".to_vec())
            .build()
    }

    pub fn upload_ok(version: Version) -> Self {
        Self::ok(version, b"Uploaded successfully!\r\n".to_vec())
    }

    /// Interim `100 Continue` sent before reading an upload body.
    pub fn continue_(version: Version) -> Self {
        ResponseBuilder::new(StatusCode::Continue)
            .version(version)
            .interim()
            .build()
    }

    /// Standard error response: the status repeated as a short text body.
    pub fn error(status: StatusCode, version: Version) -> Self {
        let body = format!("{} {}\r\n", status.as_u16(), status.reason_phrase());
        ResponseBuilder::new(status)
            .version(version)
            .body(body.into_bytes())
            .build()
    }
}
