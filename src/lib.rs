//! Cubby - per-user file storage over HTTP
//!
//! Log in to get a session cookie, then GET and POST files inside your own
//! directory under `webdir/`.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod files;
pub mod http;
pub mod server;
pub mod util;
