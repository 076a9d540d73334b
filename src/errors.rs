use std::time::Duration;

use thiserror::Error;

use crate::types::LoginResult;

/// Every way a login attempt can end without a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("A login attempt is already in progress")]
    AlreadySubmitting,

    #[error("Could not reach the login server: {0}")]
    Transport(String),

    #[error("Login server did not respond within {}", format_timeout(.0))]
    Timeout(Duration),

    #[error("Login server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response from login server: {0}")]
    Protocol(String),

    /// Message is the server's body, verbatim.
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for LoginError {
    fn from(error: reqwest::Error) -> Self {
        // Strip the URL so the message stays short in the form's error label.
        LoginError::Transport(error.without_url().to_string())
    }
}

impl From<LoginError> for LoginResult {
    fn from(error: LoginError) -> Self {
        LoginResult::failure(error.to_string())
    }
}

fn format_timeout(timeout: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*timeout)
}

/// First non-blank line of an error body, for `Http` messages.
pub(crate) fn summarize_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("No details returned by server.")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_verbatim() {
        let result = LoginResult::from(LoginError::Rejected("Invalid password".into()));
        assert_eq!(result, LoginResult::failure("Invalid password"));
    }

    #[test]
    fn validation_message() {
        assert_eq!(
            LoginError::MissingCredentials.to_string(),
            "Username and password are required"
        );
    }

    #[test]
    fn timeout_message_is_human_readable() {
        let message = LoginError::Timeout(Duration::from_secs(25)).to_string();
        assert_eq!(message, "Login server did not respond within 25s");
    }

    #[test]
    fn body_summary() {
        assert_eq!(summarize_body("\n  Bad Gateway \nmore"), "Bad Gateway");
        assert_eq!(summarize_body("   "), "No details returned by server.");
    }
}
