//! Authentication
//!
//! Credentials live in a flat `users` file, sessions in an append-only
//! `cookies` file. A successful login appends a line and hands the token back
//! as the `blarg` cookie; later requests are matched against that file.

pub mod session;
pub mod store;
pub mod token;

pub use session::{Authenticator, Credentials};
pub use store::{CredentialStore, StoreError};
pub use token::TokenMode;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "blarg";

/// Upper bound, in bytes, for usernames and passwords.
pub const MAX_CRED_LEN: usize = 32;
