//! Login and cookie verification.

use crate::auth::store::CredentialStore;
use crate::auth::token::{self, TokenMode};
use crate::auth::{MAX_CRED_LEN, SESSION_COOKIE};
use crate::error::HandlerError;
use crate::http::request::Request;
use crate::util::truncate_utf8;

/// Username and password taken from a login target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parses `/login?username=U&password=P`.
    ///
    /// The query is split at the first `&`, so the password may contain `&`.
    /// A `"` ends the password. Both values are cut to [`MAX_CRED_LEN`] bytes.
    pub fn from_target(target: &str) -> Result<Self, HandlerError> {
        if !target.contains('?') || !target.contains('&') {
            return Err(HandlerError::bad_request("login target needs '?' and '&'"));
        }

        let (_, query) = target
            .split_once('?')
            .ok_or_else(|| HandlerError::bad_request("login target has no query"))?;
        let (user_field, pass_field) = query
            .split_once('&')
            .ok_or_else(|| HandlerError::bad_request("login query has no '&'"))?;

        let username = user_field
            .strip_prefix("username=")
            .ok_or_else(|| HandlerError::bad_request("missing username field"))?;
        let password = pass_field
            .strip_prefix("password=")
            .ok_or_else(|| HandlerError::bad_request("missing password field"))?;
        let password = match password.find('"') {
            Some(end) => &password[..end],
            None => password,
        };

        let username = truncate_utf8(username, MAX_CRED_LEN);
        if !is_safe_username(username) {
            return Err(HandlerError::bad_request("username is not usable"));
        }

        Ok(Self {
            username: username.to_string(),
            password: truncate_utf8(password, MAX_CRED_LEN).to_string(),
        })
    }
}

/// A username becomes a directory name and the key of a `name:token` line.
pub fn is_safe_username(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', ':'])
        && !name.chars().any(|c| c.is_control())
}

/// Value of the `blarg` pair in the `Cookie` header, if present and non-empty.
pub fn session_cookie(request: &Request) -> Option<&str> {
    request
        .header("Cookie")?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

pub struct Authenticator {
    store: CredentialStore,
    token_mode: TokenMode,
}

impl Authenticator {
    pub fn new(store: CredentialStore, token_mode: TokenMode) -> Self {
        Self { store, token_mode }
    }

    /// Checks the pair against the users file and issues a session token.
    pub async fn login(&self, creds: &Credentials) -> Result<String, HandlerError> {
        if !self
            .store
            .check_credentials(&creds.username, &creds.password)
            .await?
        {
            tracing::info!(user = %creds.username, "Login rejected");
            return Err(HandlerError::Unauthorized);
        }

        let token = token::mint(self.token_mode);
        self.store.append_session(&creds.username, &token).await?;

        tracing::info!(user = %creds.username, "Session issued");
        Ok(token)
    }

    /// Resolves the request's session cookie to a username.
    pub async fn verify(&self, request: &Request) -> Result<String, HandlerError> {
        let token = session_cookie(request).ok_or(HandlerError::Unauthorized)?;

        match self.store.find_session(token).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(target_path = %request.target, "Unknown session cookie");
                Err(HandlerError::Unauthorized)
            }
        }
    }
}
