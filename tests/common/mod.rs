#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cubby::config::Config;
use cubby::http::connection::Connection;
use cubby::server::ServerContext;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

pub const USERS: &str = "alice:wonderland\nbob:builder\r\n";

/// A server root in a temp dir with two provisioned users.
pub struct Fixture {
    pub dir: TempDir,
    pub ctx: Arc<ServerContext>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("users"), USERS).unwrap();

        let config = Config {
            root_dir: Some(dir.path().to_path_buf()),
            body_timeout_secs: 2,
            header_timeout_secs: 2,
            ..Config::default()
        };

        Self {
            dir,
            ctx: Arc::new(ServerContext::new(config)),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn user_file(&self, user: &str, rel: &str) -> PathBuf {
        self.root().join("webdir").join(user).join(rel)
    }

    /// Starts a connection task and returns the client end.
    pub fn connect(&self) -> (DuplexStream, JoinHandle<anyhow::Result<()>>) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let ctx = Arc::clone(&self.ctx);
        let task = tokio::spawn(async move { Connection::new(server, ctx).run().await });
        (client, task)
    }

    /// Sends one request and collects everything until the server closes.
    pub async fn send(&self, request: &[u8]) -> Vec<u8> {
        let (mut client, task) = self.connect();
        client.write_all(request).await.unwrap();

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        task.await.unwrap().unwrap();
        out
    }

    pub async fn login(&self, user: &str, password: &str) -> String {
        let req = format!(
            "POST /login?username={}&password={} HTTP/1.1\r\nHost: localhost\r\n\r\n",
            user, password
        );
        let resp = self.send(req.as_bytes()).await;
        cookie_from(&resp).expect("login should set a cookie")
    }
}

pub fn text(resp: &[u8]) -> String {
    String::from_utf8_lossy(resp).into_owned()
}

pub fn status_line(resp: &[u8]) -> String {
    text(resp).lines().next().unwrap_or_default().to_string()
}

/// Bytes after the first blank line.
pub fn body(resp: &[u8]) -> &[u8] {
    let end = resp
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a head");
    &resp[end + 4..]
}

pub fn cookie_from(resp: &[u8]) -> Option<String> {
    let text = text(resp);
    let line = text.lines().find(|l| l.starts_with("Set-Cookie: blarg="))?;
    let value = line.trim_start_matches("Set-Cookie: blarg=");
    Some(value.split(';').next()?.to_string())
}
