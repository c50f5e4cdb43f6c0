use cubby::http::request::Version;
use cubby::http::response::{Response, ResponseBuilder, StatusCode};
use cubby::http::writer::{ResponseWriter, VERSION_NOT_SUPPORTED, serialize_response};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Continue.as_u16(), 100);
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Unauthorized.as_u16(), 401);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Unauthorized.reason_phrase(), "Unauthorized");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_error_response_format() {
    let wire = serialize_response(&Response::error(StatusCode::NotFound, Version::Http10));

    assert_eq!(
        wire,
        b"HTTP/1.0 404 Not Found\r\nConnection: Closed\r\n\r\n404 Not Found\r\n".to_vec()
    );
}

#[test]
fn test_every_error_status_closes() {
    for status in [
        StatusCode::BadRequest,
        StatusCode::Unauthorized,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::InternalServerError,
    ] {
        let resp = Response::error(status, Version::Http11);
        assert!(resp.headers.contains(&("Connection".to_string(), "Closed".to_string())));
        let expected_body = format!("{} {}\r\n", status.as_u16(), status.reason_phrase());
        assert_eq!(resp.body, expected_body.into_bytes());
    }
}

#[test]
fn test_login_response_sets_http_only_cookie() {
    let wire = serialize_response(&Response::login_ok(Version::Http11, "blarg", "12345"));
    let text = String::from_utf8(wire).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Set-Cookie: blarg=12345; HttpOnly;\r\n"));
    assert!(text.contains("Connection: Closed\r\n"));
    assert!(text.ends_with("\r\n\r\nSuccessfully logged in!\r\n"));
}

#[test]
fn test_continue_is_interim() {
    let wire = serialize_response(&Response::continue_(Version::Http11));
    assert_eq!(wire, b"HTTP/1.1 100 Continue\r\n\r\n".to_vec());
}

#[test]
fn test_stream_head_has_no_length() {
    let wire = serialize_response(&Response::stream_head(Version::Http11));
    assert_eq!(wire, b"HTTP/1.1 200 OK\r\nConnection: Closed\r\n\r\n".to_vec());
}

#[test]
fn test_response_builder_replaces_header() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-Custom", "one")
        .header("X-Custom", "two")
        .build();

    let customs: Vec<_> = response
        .headers
        .iter()
        .filter(|(k, _)| k == "X-Custom")
        .collect();
    assert_eq!(customs.len(), 1);
    assert_eq!(customs[0].1, "two");
}

#[tokio::test]
async fn test_writer_writes_everything() {
    let (mut client, mut server) = tokio::io::duplex(16);
    let writer = tokio::spawn(async move {
        ResponseWriter::raw(VERSION_NOT_SUPPORTED)
            .write_to_stream(&mut server)
            .await
    });

    let mut out = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut client, &mut out)
        .await
        .unwrap();
    writer.await.unwrap().unwrap();

    assert_eq!(out, VERSION_NOT_SUPPORTED);
}
