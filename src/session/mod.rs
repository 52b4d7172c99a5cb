//! Console session lookup.
//!
//! DESIGN
//! ======
//! A single outbound request per call, no caching and no retries. The remote
//! session service is the only collaborator; everything it can get wrong is
//! reported as a [`SessionError`] internally and as `None` to callers of
//! [`resolve_current_user`].

pub mod config;
pub mod resolver;
pub mod types;

pub use config::{CredentialsMode, SessionConfig, SessionTimeouts};
pub use resolver::SessionUserResolver;
pub use types::{ConsoleUser, SessionError};

/// Resolve the signed-in console user using `CONSOLE_*` environment config.
///
/// Configuration problems are logged and yield `None` like any other failure.
pub async fn resolve_current_user() -> Option<ConsoleUser> {
    match SessionUserResolver::from_env() {
        Ok(resolver) => resolver.resolve_current_user().await,
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "failed to fetch console user");
            None
        }
    }
}
