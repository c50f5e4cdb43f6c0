//! Runtime configuration.
//!
//! Values come from an optional YAML file (path in `CUBBY_CONFIG`) and are
//! then overridden by `LISTEN` and `CUBBY_ROOT`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::auth::token::TokenMode;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory holding `webdir/`. `None` means the working directory at
    /// request time.
    pub root_dir: Option<PathBuf>,
    pub users_file: PathBuf,
    pub cookies_file: PathBuf,
    pub token_mode: TokenMode,
    pub header_timeout_secs: u64,
    pub body_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root_dir: None,
            users_file: PathBuf::from("users"),
            cookies_file: PathBuf::from("cookies"),
            token_mode: TokenMode::Secure,
            header_timeout_secs: 10,
            body_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CUBBY_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml_str(&raw)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("CUBBY_ROOT") {
            cfg.root_dir = Some(PathBuf::from(root));
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(raw).context("invalid YAML configuration")
    }

    pub fn users_path(&self) -> PathBuf {
        self.store_path(&self.users_file)
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.store_path(&self.cookies_file)
    }

    pub fn header_timeout(&self) -> Duration {
        Duration::from_secs(self.header_timeout_secs)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout_secs)
    }

    // Relative store files live next to `webdir/`.
    fn store_path(&self, file: &Path) -> PathBuf {
        match &self.root_dir {
            Some(root) if file.is_relative() => root.join(file),
            _ => file.to_path_buf(),
        }
    }
}
