//! Request routing.
//!
//! Parses the buffered head, picks a handler and turns every failure into its
//! terminal response. Nothing here retries; each request gets exactly one
//! answer and the connection closes afterwards.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::auth::SESSION_COOKIE;
use crate::auth::session::Credentials;
use crate::error::HandlerError;
use crate::files::{self, UploadMode, transfer};
use crate::http::parser::parse_http_request;
use crate::http::request::{Method, Request, Version};
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, VERSION_NOT_SUPPORTED};
use crate::server::ServerContext;

pub async fn dispatch<S>(stream: &mut S, buffer: &[u8], ctx: &ServerContext) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = match parse_http_request(buffer) {
        Ok(request) => request,
        Err(e) => return respond_error(stream, &e.into(), Version::Http11).await,
    };

    tracing::debug!(method = ?request.method, path = %request.target, "Request received");

    match &request.method {
        Method::GET => handle_get(stream, &request, ctx).await,
        Method::POST if request.is_login() => {
            let response = match login(&request, ctx).await {
                Ok(response) => response,
                Err(e) => return respond_error(stream, &e, request.version).await,
            };
            ResponseWriter::new(&response).write_to_stream(stream).await
        }
        Method::POST => handle_upload(stream, &request, ctx).await,
        Method::Other(name) => {
            let err = HandlerError::MethodNotAllowed(name.clone());
            respond_error(stream, &err, request.version).await
        }
    }
}

async fn login(request: &Request, ctx: &ServerContext) -> Result<Response, HandlerError> {
    let creds = Credentials::from_target(&request.target)?;
    let token = ctx.auth.login(&creds).await?;
    Ok(Response::login_ok(request.version, SESSION_COOKIE, &token))
}

async fn handle_get<S>(
    stream: &mut S,
    request: &Request,
    ctx: &ServerContext,
) -> anyhow::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let opened = async {
        let user = ctx.auth.verify(request).await?;
        let path = sandboxed(ctx, &user, &request.target)?;
        let file = transfer::open_download(&path).await?;
        Ok::<_, HandlerError>((user, file))
    }
    .await;

    let (user, file) = match opened {
        Ok(opened) => opened,
        Err(e) => return respond_error(stream, &e, request.version).await,
    };

    // The 200 head is on the wire once streaming starts; a failure past this
    // point can only close the connection.
    let bytes = transfer::stream_file(stream, file, request.version).await?;
    tracing::info!(user = %user, path = %request.target, bytes, "Download complete");
    Ok(())
}

async fn handle_upload<S>(
    stream: &mut S,
    request: &Request,
    ctx: &ServerContext,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let stored = async {
        let user = ctx.auth.verify(request).await?;
        let path = sandboxed(ctx, &user, &request.target)?;
        let bytes = transfer::upload(stream, request, &path, ctx.config.body_timeout()).await?;
        Ok::<_, HandlerError>((user, bytes))
    }
    .await;

    match stored {
        Ok((user, bytes)) => {
            tracing::info!(
                user = %user,
                path = %request.target,
                mode = ?UploadMode::of(request),
                bytes,
                "Upload complete"
            );
            ResponseWriter::new(&Response::upload_ok(request.version))
                .write_to_stream(stream)
                .await
        }
        Err(e) => respond_error(stream, &e, request.version).await,
    }
}

fn sandboxed(
    ctx: &ServerContext,
    user: &str,
    target: &str,
) -> Result<files::SandboxedPath, HandlerError> {
    let root = ctx.root()?;
    files::resolve(&root, user, target).map_err(|e| match e {
        files::ResolveError::UnsafeUsername(_) => {
            tracing::warn!(user = %user, "Session belongs to an unusable username");
            HandlerError::Unauthorized
        }
        other => HandlerError::internal("resolve path", other),
    })
}

pub async fn respond_error<S>(
    stream: &mut S,
    err: &HandlerError,
    version: Version,
) -> anyhow::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let status = err.status();
    match err {
        HandlerError::Internal(_) => {
            tracing::error!(status = status.as_u16(), error = %err, "Request failed")
        }
        HandlerError::Unauthorized => tracing::info!(status = status.as_u16(), "Request rejected"),
        _ => tracing::warn!(status = status.as_u16(), error = %err, "Request failed"),
    }

    let mut writer = match err {
        HandlerError::VersionNotSupported(_) => ResponseWriter::raw(VERSION_NOT_SUPPORTED),
        _ => ResponseWriter::new(&Response::error(status, version)),
    };
    writer.write_to_stream(stream).await
}
