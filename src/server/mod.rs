//! Process-wide state and the accept loop.

pub mod listener;

use std::path::PathBuf;

use crate::auth::{Authenticator, CredentialStore};
use crate::config::Config;
use crate::error::HandlerError;

/// Everything a connection task needs, shared behind an `Arc`.
pub struct ServerContext {
    pub config: Config,
    pub auth: Authenticator,
}

impl ServerContext {
    pub fn new(config: Config) -> Self {
        let store = CredentialStore::new(config.users_path(), config.cookies_path());
        let auth = Authenticator::new(store, config.token_mode);
        Self { config, auth }
    }

    /// Directory that holds `webdir/`: the configured root, otherwise the
    /// working directory as of this request.
    pub fn root(&self) -> Result<PathBuf, HandlerError> {
        match &self.config.root_dir {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir()
                .map_err(|e| HandlerError::internal("read working directory", e)),
        }
    }
}
