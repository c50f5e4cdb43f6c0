//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.0 and HTTP/1.1 for one request per connection.
//!
//! # Architecture
//!
//! - **`connection`**: reads the request head off the socket and hands it to the dispatcher
//! - **`parser`**: splits the buffered bytes into request line, headers and early body bytes
//! - **`request`**: parsed request plus typed accessors (`Content-Length`, `Expect`)
//! - **`response`**: status codes and response construction
//! - **`writer`**: serializes responses onto the stream
//!
//! # Connection Lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │ Read head   │ ← until "\r\n\r\n", EOF, size cap or timeout
//!        └──────┬──────┘
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatch       │ ← login / download / upload / error
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Closed        │ ← always, "Connection: Closed"
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cubby::{config::Config, http::connection::Connection, server::ServerContext};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = Arc::new(ServerContext::new(Config::default()));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let ctx = ctx.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, ctx);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
