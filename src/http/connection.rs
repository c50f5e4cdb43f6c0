use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::dispatch::{dispatch, respond_error};
use crate::error::HandlerError;
use crate::http::parser::{ParseError, find_headers_end};
use crate::http::request::Version;
use crate::server::ServerContext;

/// Largest request head accepted before giving up on finding its end.
pub const MAX_HEAD_LEN: usize = 8192;

/// One client connection carrying exactly one request.
pub struct Connection<S> {
    stream: S,
    buffer: Vec<u8>,
    ctx: Arc<ServerContext>,
}

enum HeadState {
    /// Blank line seen, or the peer stopped sending after some bytes.
    Ready,
    /// Peer closed without sending anything.
    Empty,
    TooLarge,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            ctx,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let head_timeout = self.ctx.config.header_timeout();

        let state = match timeout(head_timeout, self.read_head()).await {
            Ok(state) => state?,
            Err(_) => {
                tracing::debug!(buffered = self.buffer.len(), "Timed out waiting for request head");
                return Ok(());
            }
        };

        match state {
            HeadState::Ready => {
                dispatch(&mut self.stream, &self.buffer, &self.ctx).await?;
            }
            HeadState::Empty => return Ok(()),
            HeadState::TooLarge => {
                let err = HandlerError::bad_request(ParseError::HeadTooLarge(MAX_HEAD_LEN));
                respond_error(&mut self.stream, &err, Version::Http11).await?;
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }
        Ok(())
    }

    async fn read_head(&mut self) -> anyhow::Result<HeadState> {
        loop {
            if find_headers_end(&self.buffer).is_some() {
                return Ok(HeadState::Ready);
            }
            if self.buffer.len() >= MAX_HEAD_LEN {
                return Ok(HeadState::TooLarge);
            }

            let mut temp = [0u8; 1024];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                return Ok(if self.buffer.is_empty() {
                    HeadState::Empty
                } else {
                    HeadState::Ready
                });
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
