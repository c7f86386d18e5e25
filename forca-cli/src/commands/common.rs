use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::session::{AuthContext, AuthState, User};

/// Spinner shown while a request is in flight
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Print a failure inline
pub fn print_error(message: impl std::fmt::Display) {
    println!("{} {}", "✗".red(), message);
}

/// Marks an error the user has already seen inline; the binary exits with a
/// failure status without printing it again
#[derive(Debug, Error)]
#[error("error already shown")]
pub struct Reported;

/// Whether the error was printed inline by [`report`] or [`failure`]
pub fn already_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Reported>().is_some()
}

/// Print the error of a failed step inline before handing it on
pub fn report<T>(result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        print_error(format!("{:#}", e));
        e.context(Reported)
    })
}

/// Print `message` inline and turn it into an error
pub fn failure(message: impl Into<String>) -> anyhow::Error {
    let message = message.into();
    print_error(&message);
    anyhow::anyhow!(message).context(Reported)
}

pub fn print_success(message: impl std::fmt::Display) {
    println!("{} {}", "✓".green(), message);
}

/// Interactive screens and prompts need a terminal on both ends
pub fn require_terminal(what: &str) -> Result<()> {
    if !Term::stdout().is_term() || !Term::stderr().is_term() {
        bail!("{} needs an interactive terminal", what);
    }
    Ok(())
}

/// Auth context over the configured service
pub fn connect(config: Config) -> Result<AuthContext> {
    let client = BackendClient::new(config).context("Could not create the service client")?;
    Ok(AuthContext::new(client))
}

/// Restore the stored session; fails when nobody is signed in
pub async fn signed_in(config: Config) -> Result<(AuthContext, User)> {
    let auth = connect(config)?;

    let pb = spinner("Checking session...");
    let state = auth.restore().await;
    pb.finish_and_clear();

    match state {
        AuthState::SignedIn(user) => Ok((auth, user)),
        _ => bail!("You are not logged in. Use 'forca login' to authenticate."),
    }
}

/// Format with the configured pattern, falling back to ISO when the pattern
/// is invalid
pub fn format_date(date: NaiveDate, config: &Config) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    match write!(out, "{}", date.format(&config.ui.date_format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

/// Placeholder for missing values in tables
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
