//! Moving file bytes between disk and the connection.

use std::io;
use std::path::Path;
use std::time::Duration;

use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::HandlerError;
use crate::files::path::SandboxedPath;
use crate::http::request::{Request, Version};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Size of each read from disk or from the client.
pub const CHUNK_SIZE: usize = 2048;

/// How the client delivers an upload body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// `Expect: 100-continue`; the body follows our interim reply.
    Continue,
    /// The body was sent right behind the head.
    Immediate,
}

impl UploadMode {
    pub fn of(request: &Request) -> Self {
        if request.expects_continue() {
            UploadMode::Continue
        } else {
            UploadMode::Immediate
        }
    }
}

/// Opens a file for download. Anything that is not a readable regular file
/// counts as not found.
pub async fn open_download(path: &SandboxedPath) -> Result<File, HandlerError> {
    let not_found = || HandlerError::NotFound(path.as_path().display().to_string());

    let file = File::open(path.as_path()).await.map_err(|_| not_found())?;
    let meta = file.metadata().await.map_err(|_| not_found())?;
    if !meta.is_file() {
        return Err(not_found());
    }
    Ok(file)
}

/// Writes the 200 head and then the whole file. The body is delimited by the
/// connection closing, so no `Content-Length` is sent.
pub async fn stream_file<S>(stream: &mut S, mut file: File, version: Version) -> anyhow::Result<u64>
where
    S: AsyncWrite + Unpin,
{
    ResponseWriter::new(&Response::stream_head(version))
        .write_to_stream(stream)
        .await?;

    let mut buf = [0u8; CHUNK_SIZE];
    let mut sent = 0u64;
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        stream.write_all(&buf[..n]).await?;
        sent += n as u64;
    }
    stream.flush().await?;

    Ok(sent)
}

/// Stores the request body at `path`.
///
/// The target and `Content-Length` are validated before anything touches the
/// disk. The destination is truncated, so a re-upload replaces the old
/// content. A body that stops early leaves the partial file behind.
pub async fn upload<S>(
    stream: &mut S,
    request: &Request,
    path: &SandboxedPath,
    body_timeout: Duration,
) -> Result<u64, HandlerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if path.names_directory() {
        return Err(HandlerError::bad_request(format!(
            "upload target {} has no file name",
            request.target
        )));
    }
    let length = request.content_length()?;
    let mut file = create_destination(path).await?;

    if UploadMode::of(request) == UploadMode::Continue {
        ResponseWriter::new(&Response::continue_(request.version))
            .write_to_stream(stream)
            .await
            .map_err(|e| HandlerError::internal("send 100 Continue", e))?;
    }

    copy_body(stream, &mut file, &request.body, length, body_timeout).await
}

/// Creates `webdir`, the user directory and every directory on the way to the
/// file, then opens the file truncated.
pub async fn create_destination(path: &SandboxedPath) -> Result<File, HandlerError> {
    let user_dir = path.user_dir();
    if let Some(webdir) = user_dir.parent() {
        create_dir_tolerant(webdir).await?;
    }
    create_dir_tolerant(user_dir).await?;
    for dir in path.intermediate_dirs() {
        create_dir_tolerant(&dir).await?;
    }

    File::create(path.as_path())
        .await
        .map_err(|e| HandlerError::internal("create destination file", e))
}

async fn create_dir_tolerant(dir: &Path) -> Result<(), HandlerError> {
    match tokio::fs::create_dir(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(HandlerError::internal(
            &format!("create directory {}", dir.display()),
            e,
        )),
    }
}

/// Writes `length` body bytes: first those already buffered with the head,
/// then whatever still has to come off the connection. The file is flushed
/// even when the body ends early, so the partial content is on disk.
pub async fn copy_body<S>(
    stream: &mut S,
    file: &mut File,
    buffered: &[u8],
    length: usize,
    read_timeout: Duration,
) -> Result<u64, HandlerError>
where
    S: AsyncRead + Unpin,
{
    let early = &buffered[..buffered.len().min(length)];
    file.write_all(early).await.map_err(write_err)?;

    let outcome = pump(stream, file, early.len(), length, read_timeout).await;
    file.flush().await.map_err(write_err)?;

    outcome.map(|written| written as u64)
}

async fn pump<S>(
    stream: &mut S,
    file: &mut File,
    mut written: usize,
    length: usize,
    read_timeout: Duration,
) -> Result<usize, HandlerError>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(CHUNK_SIZE);
    while written < length {
        let to_read = (length - written).min(CHUNK_SIZE);
        buffer.resize(to_read, 0);

        let n = match timeout(read_timeout, stream.read(&mut buffer[..to_read])).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(HandlerError::internal("read upload body", e)),
            Err(_) => {
                return Err(HandlerError::bad_request(format!(
                    "upload stalled after {} of {} bytes",
                    written, length
                )));
            }
        };

        if n == 0 {
            return Err(HandlerError::bad_request(format!(
                "connection closed after {} of {} bytes",
                written, length
            )));
        }

        file.write_all(&buffer[..n]).await.map_err(write_err)?;
        written += n;
    }

    Ok(written)
}

fn write_err(e: io::Error) -> HandlerError {
    HandlerError::internal("write upload", e)
}
