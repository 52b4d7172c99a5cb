//! Resolve the currently authenticated console user from the remote session
//! endpoint.

pub mod session;

pub use session::{
    ConsoleUser, CredentialsMode, SessionConfig, SessionError, SessionUserResolver, resolve_current_user,
};
