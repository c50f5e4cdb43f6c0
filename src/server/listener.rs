use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::http::connection::Connection;
use crate::server::ServerContext;

pub async fn run(ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&ctx.config.listen_addr).await?;
    info!("Listening on {}", ctx.config.listen_addr);

    serve(listener, ctx).await
}

/// Accepts forever, one task per connection.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        debug!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                tracing::error!(peer = %peer, error = %e, "Connection error");
            }
        });
    }
}
