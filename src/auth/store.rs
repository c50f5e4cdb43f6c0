//! Line-oriented credential and session files.
//!
//! `users` holds `username:password` lines and is only read. `cookies` holds
//! `username:token\r\n` lines and only grows. Both are scanned front to back
//! and the first matching line wins.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;

use crate::auth::MAX_CRED_LEN;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to {}: {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Shared handle on the two store files.
///
/// All connection tasks go through one instance. Scans hold the read lock and
/// appends hold the write lock, so a reader never sees half a line.
#[derive(Debug)]
pub struct CredentialStore {
    users_path: PathBuf,
    cookies_path: PathBuf,
    lock: RwLock<()>,
}

impl CredentialStore {
    pub fn new(users_path: impl Into<PathBuf>, cookies_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            cookies_path: cookies_path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Looks for a `username:password` line equal to the given pair.
    pub async fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        let record = format!("{}:{}", username, password);
        let _guard = self.lock.read().await;

        let file = File::open(&self.users_path)
            .await
            .map_err(|source| StoreError::Open {
                path: self.users_path.clone(),
                source,
            })?;
        let mut lines = LineScanner::new(file);

        while let Some(line) = lines.next_line().await.map_err(|source| StoreError::Read {
            path: self.users_path.clone(),
            source,
        })? {
            if line == record.as_bytes() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Appends `username:token\r\n` to the cookies file, creating it if needed.
    pub async fn append_session(&self, username: &str, token: &str) -> Result<(), StoreError> {
        let line = format!("{}:{}\r\n", username, token);
        let _guard = self.lock.write().await;

        let append_err = |source| StoreError::Append {
            path: self.cookies_path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.cookies_path)
            .await
            .map_err(|source| StoreError::Open {
                path: self.cookies_path.clone(),
                source,
            })?;

        file.write_all(line.as_bytes()).await.map_err(append_err)?;
        file.flush().await.map_err(append_err)?;

        Ok(())
    }

    /// Returns the username bound to `token`, if any line carries it.
    ///
    /// A missing cookies file simply means nobody has logged in yet.
    pub async fn find_session(&self, token: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.read().await;

        let file = match File::open(&self.cookies_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Open {
                    path: self.cookies_path.clone(),
                    source,
                });
            }
        };
        let mut lines = LineScanner::new(file);

        while let Some(line) = lines.next_line().await.map_err(|source| StoreError::Read {
            path: self.cookies_path.clone(),
            source,
        })? {
            let Some(colon) = line.iter().position(|&b| b == b':') else {
                tracing::warn!(
                    file = %self.cookies_path.display(),
                    "Skipping session line without ':'"
                );
                continue;
            };

            if &line[colon + 1..] == token.as_bytes() {
                let name = &line[..colon.min(MAX_CRED_LEN)];
                return Ok(Some(String::from_utf8_lossy(name).into_owned()));
            }
        }

        Ok(None)
    }
}

struct LineScanner {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl LineScanner {
    fn new(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
            buf: Vec::new(),
        }
    }

    /// Next line with its `\n` or `\r\n` terminator removed.
    async fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line_end(&self.buf)))
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
