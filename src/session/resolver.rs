//! Session user resolver — one GET to the session endpoint, normalized.
//!
//! ARCHITECTURE
//! ============
//! `fetch_current_user` keeps the tagged [`SessionError`] so callers and the
//! CLI can tell a broken lookup from a signed-out user.
//! `resolve_current_user` collapses every failure into `None` and is the
//! entry point for callers that only need "who is signed in, if anyone".
//!
//! Cookie handling is an explicit transport option: in
//! [`CredentialsMode::Include`] the client carries a cookie store (its own, or
//! one supplied by the host), in [`CredentialsMode::Omit`] it has none.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, HeaderValue};

use super::config::{CredentialsMode, SessionConfig};
use super::types::{ConsoleUser, SessionError, parse_session_body};

pub struct SessionUserResolver {
    http: reqwest::Client,
    url: Url,
    jar: Option<Arc<Jar>>,
}

impl SessionUserResolver {
    /// Build a resolver with its own cookie store (in `Include` mode).
    ///
    /// # Errors
    ///
    /// Returns an error if the session URL is invalid or the HTTP client
    /// fails to build.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::build(config, Arc::new(Jar::default()))
    }

    /// Build a resolver that shares the caller's cookie store.
    ///
    /// The jar is ignored in `Omit` mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the session URL is invalid or the HTTP client
    /// fails to build.
    pub fn with_cookie_jar(config: SessionConfig, jar: Arc<Jar>) -> Result<Self, SessionError> {
        Self::build(config, jar)
    }

    /// Build a resolver from `CONSOLE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the HTTP client fails.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::new(SessionConfig::from_env()?)
    }

    fn build(config: SessionConfig, jar: Arc<Jar>) -> Result<Self, SessionError> {
        let url = Url::parse(&config.session_url)
            .map_err(|e| SessionError::ConfigParse(format!("invalid session url '{}': {e}", config.session_url)))?;

        let jar = match config.credentials {
            CredentialsMode::Include => {
                if let Some(cookie) = &config.session_cookie {
                    jar.add_cookie_str(cookie, &url);
                }
                Some(jar)
            }
            CredentialsMode::Omit => {
                if config.session_cookie.is_some() {
                    tracing::debug!("session cookie ignored: credentials are omitted");
                }
                None
            }
        };

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if let Some(jar) = &jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }
        let http = builder
            .build()
            .map_err(|e| SessionError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, url, jar })
    }

    /// The session endpoint this resolver queries.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The cookie store in use, or `None` when credentials are omitted.
    #[must_use]
    pub fn cookie_jar(&self) -> Option<&Arc<Jar>> {
        self.jar.as_ref()
    }

    /// Fetch and normalize the current user, keeping the failure reason.
    ///
    /// # Errors
    ///
    /// See [`SessionError`]: `Request`, `Status`, `Parse`, `MissingUser` or
    /// `IncompleteUser`.
    pub async fn fetch_current_user(&self) -> Result<ConsoleUser, SessionError> {
        let response = self
            .http
            .get(self.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| SessionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status { status: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SessionError::Request(e.to_string()))?;
        parse_session_body(&body)
    }

    /// Resolve the current user, or `None` if there is none or the lookup
    /// failed for any reason. Never returns an error.
    pub async fn resolve_current_user(&self) -> Option<ConsoleUser> {
        match self.fetch_current_user().await {
            Ok(user) => Some(user),
            Err(e) if e.is_fault() => {
                tracing::warn!(error = %e, code = e.error_code(), url = %self.url, "failed to fetch console user");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, url = %self.url, "no console user");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
