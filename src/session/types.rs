//! Session types — the normalized console user, wire shapes, and errors.
//!
//! DESIGN
//! ======
//! The session endpoint is loosely typed: identifiers may be strings or
//! numbers, the admin flag may be any JSON value, and `user` may be missing
//! or null. Wire fields are kept as raw `serde_json::Value` and normalized
//! here so the resolver only deals with a fully populated [`ConsoleUser`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Roles that grant admin access. Matched case-sensitively.
pub const ADMIN_ROLES: [&str; 2] = ["admin", "administrator"];

// =============================================================================
// ERROR
// =============================================================================

/// Why a session lookup produced no user.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a readable response.
    #[error("session request failed: {0}")]
    Request(String),

    /// The session endpoint answered with a non-success status.
    #[error("session endpoint returned status {status}")]
    Status { status: u16 },

    /// The response body was not usable JSON.
    #[error("session response parse failed: {0}")]
    Parse(String),

    /// The response carried no user.
    #[error("session has no user")]
    MissingUser,

    /// A user was present but lacked a required field.
    #[error("session user missing field `{0}`")]
    IncompleteUser(&'static str),
}

impl SessionError {
    /// Stable machine-readable code for this failure.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_SESSION_REQUEST",
            Self::Status { .. } => "E_SESSION_STATUS",
            Self::Parse(_) => "E_SESSION_PARSE",
            Self::MissingUser => "E_SESSION_NO_USER",
            Self::IncompleteUser(_) => "E_SESSION_INCOMPLETE_USER",
        }
    }

    /// `true` for failures that mean "the lookup itself broke", as opposed
    /// to "nobody is signed in".
    #[must_use]
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::Status { .. } | Self::MissingUser)
    }
}

// =============================================================================
// CONSOLE USER
// =============================================================================

/// The currently authenticated console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleUser {
    /// User identifier (`uuid`, or `id` when `uuid` is absent).
    pub uuid: String,
    /// Email address as reported by the session service.
    pub email: String,
    /// Zero or one role names.
    pub roles: Vec<String>,
    /// Whether the user has console admin rights.
    pub is_admin: bool,
}

impl ConsoleUser {
    /// `true` if `role` is one of the roles attached to this user.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawUser {
    #[serde(default)]
    uuid: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    email: Option<Value>,
    #[serde(default)]
    role: Option<Value>,
    #[serde(default, rename = "isAdmin")]
    is_admin: Option<Value>,
    #[serde(default, rename = "is_admin")]
    is_admin_snake: Option<Value>,
}

/// Parse a session response body into a [`ConsoleUser`].
///
/// # Errors
///
/// [`SessionError::Parse`] if the body is not JSON (or is JSON `null`),
/// [`SessionError::MissingUser`] if there is no truthy `user`, and
/// [`SessionError::IncompleteUser`] if the user lacks an identifier or email.
pub fn parse_session_body(body: &str) -> Result<ConsoleUser, SessionError> {
    let value: Value = serde_json::from_str(body).map_err(|e| SessionError::Parse(e.to_string()))?;
    let user = match &value {
        Value::Null => return Err(SessionError::Parse("response body is null".into())),
        Value::Object(map) => map.get("user").filter(|u| is_truthy(u)),
        _ => None,
    };
    let Some(user) = user else {
        return Err(SessionError::MissingUser);
    };
    normalize_user(user)
}

/// Normalize a raw `user` object.
///
/// A truthy non-object `user` carries no fields, so it fails on the
/// identifier like an empty object would.
///
/// # Errors
///
/// [`SessionError::IncompleteUser`] when no identifier or no email is present.
pub fn normalize_user(user: &Value) -> Result<ConsoleUser, SessionError> {
    let raw: RawUser = match user {
        Value::Object(_) => RawUser::deserialize(user).map_err(|e| SessionError::Parse(e.to_string()))?,
        _ => RawUser::default(),
    };

    let uuid = raw
        .uuid
        .as_ref()
        .and_then(identifier)
        .or_else(|| raw.id.as_ref().and_then(identifier))
        .ok_or(SessionError::IncompleteUser("uuid"))?;

    let email = match raw.email {
        Some(Value::String(email)) => email,
        _ => return Err(SessionError::IncompleteUser("email")),
    };

    let role = match raw.role {
        Some(Value::String(role)) if !role.is_empty() => Some(role),
        _ => None,
    };

    let is_admin = role.as_deref().is_some_and(|r| ADMIN_ROLES.contains(&r))
        || raw.is_admin.as_ref().is_some_and(is_truthy)
        || raw.is_admin_snake.as_ref().is_some_and(is_truthy);

    Ok(ConsoleUser { uuid, email, roles: role.into_iter().collect(), is_admin })
}

/// Non-empty strings and numbers are usable identifiers.
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose truthiness: `false`, `0`, `""` and `null` are falsy, everything else
/// (including empty arrays and objects) is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
