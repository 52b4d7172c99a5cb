use std::process::ExitCode;

use clap::Parser;
use console_session::{ConsoleUser, CredentialsMode, SessionConfig, SessionError, SessionUserResolver};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "console-user", about = "Show the currently signed-in console user")]
struct Cli {
    /// Session endpoint (defaults to `CONSOLE_SESSION_URL` or the public console).
    #[arg(long)]
    url: Option<String>,

    /// `name=value` session cookie to send with the request.
    #[arg(long)]
    cookie: Option<String>,

    /// Send no cookies at all.
    #[arg(long, default_value_t = false)]
    omit_credentials: bool,

    /// Print why no user was resolved instead of a bare "not signed in".
    #[arg(long, default_value_t = false)]
    explain: bool,
}

impl Cli {
    fn apply(&self, config: &mut SessionConfig) {
        if let Some(url) = &self.url {
            config.session_url = url.trim_end_matches('/').to_string();
        }
        if let Some(cookie) = &self.cookie {
            config.session_cookie = Some(cookie.clone());
        }
        if self.omit_credentials {
            config.credentials = CredentialsMode::Omit;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::from_env()?;
    cli.apply(&mut config);
    let resolver = SessionUserResolver::new(config)?;

    let user = if cli.explain {
        match resolver.fetch_current_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                eprintln!("not signed in: {e} ({})", e.error_code());
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        resolver.resolve_current_user().await
    };

    let Some(user) = user else {
        eprintln!("not signed in");
        return Ok(ExitCode::FAILURE);
    };

    print_user(&user)?;
    Ok(ExitCode::SUCCESS)
}

fn render_user(user: &ConsoleUser) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(user)?)
}

fn print_user(user: &ConsoleUser) -> Result<(), CliError> {
    let rendered = render_user(user)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
