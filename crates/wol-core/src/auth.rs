//! Request authentication rules.
//!
//! There is no session state: every API request carries the shared token
//! again, either as `Authorization: Bearer <token>` or as `?token=<token>`.
//!
//! # Decision order
//!
//! 1. `requireAuthentication == false`  ->  allowed
//! 2. no token configured               ->  denied
//! 3. bearer token present              ->  allowed iff it equals the token
//! 4. otherwise                         ->  allowed iff `?token=` equals it
//!
//! A bearer token wins over the query parameter even when the bearer value is
//! wrong and the query value is right.

use rand::{distributions::Alphanumeric, Rng};

use crate::config::WolConfig;

/// Length of tokens produced by [`generate_token`].
pub const TOKEN_LENGTH: usize = 32;

/// Returns `true` if a request carrying these credentials may use the API.
pub fn is_authenticated(
    config: &WolConfig,
    bearer_token: Option<&str>,
    query_token: Option<&str>,
) -> bool {
    if !config.require_authentication {
        return true;
    }
    if config.auth_token.is_empty() {
        return false;
    }
    match bearer_token {
        Some(token) => token == config.auth_token,
        None => query_token == Some(config.auth_token.as_str()),
    }
}

/// Returns `true` if `supplied_password` matches the dashboard password.
///
/// On success the caller hands `config.auth_token` back to the dashboard; no
/// separate session token exists.
pub fn check_login(config: &WolConfig, supplied_password: &str) -> bool {
    supplied_password == config.web_password
}

/// Extracts the token from an `Authorization` header value.
///
/// Returns `None` unless the value uses the `Bearer ` scheme, in which case
/// the query parameter is consulted instead.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// Generates a random alphanumeric API token.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
