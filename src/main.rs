use std::sync::Arc;

use cubby::config::Config;
use cubby::server::{self, ServerContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    if cfg.token_mode == cubby::auth::TokenMode::Legacy {
        tracing::warn!("Legacy session tokens are guessable; use only for compatibility");
    }
    let ctx = Arc::new(ServerContext::new(cfg));

    tokio::select! {
        res = server::listener::run(ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
