//! Session transport configuration parsed from environment variables.

use super::types::SessionError;

pub const DEFAULT_SESSION_URL: &str = "https://console.svc.plus/api/auth/session";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Whether ambient credentials (cookies) travel with the session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Attach cookies from the resolver's cookie store.
    #[default]
    Include,
    /// Never send or store cookies.
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_url: String,
    pub credentials: CredentialsMode,
    /// `name=value` cookie seeded into the store for the session URL.
    pub session_cookie: Option<String>,
    pub timeouts: SessionTimeouts,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_url: DEFAULT_SESSION_URL.to_string(),
            credentials: CredentialsMode::default(),
            session_cookie: None,
            timeouts: SessionTimeouts::default(),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `CONSOLE_SESSION_URL`: default `https://console.svc.plus/api/auth/session`
    /// - `CONSOLE_CREDENTIALS`: `include` (default) or `omit`
    /// - `CONSOLE_SESSION_COOKIE`: `name=value` cookie to send in `include` mode
    /// - `CONSOLE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CONSOLE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// Timeouts that are unparsable or `0` fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConfigParse`] for an unknown credentials mode.
    pub fn from_env() -> Result<Self, SessionError> {
        let session_url = std::env::var("CONSOLE_SESSION_URL")
            .unwrap_or_else(|_| DEFAULT_SESSION_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let credentials = parse_credentials(std::env::var("CONSOLE_CREDENTIALS").ok().as_deref())?;
        let session_cookie = std::env::var("CONSOLE_SESSION_COOKIE")
            .ok()
            .filter(|c| !c.trim().is_empty());
        let timeouts = SessionTimeouts {
            request_secs: env_parse_u64("CONSOLE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CONSOLE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { session_url, credentials, session_cookie, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

pub(crate) fn parse_credentials(raw: Option<&str>) -> Result<CredentialsMode, SessionError> {
    match raw.unwrap_or("include") {
        "include" => Ok(CredentialsMode::Include),
        "omit" => Ok(CredentialsMode::Omit),
        other => Err(SessionError::ConfigParse(format!(
            "unsupported credentials mode '{other}' (expected 'include' or 'omit')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
