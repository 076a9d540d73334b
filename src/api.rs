use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response, Url};

use crate::errors::{summarize_body, LoginError};
use crate::protocol::parse_login_response;
use crate::types::{Credentials, LoginRequest, LoginResult, Session};

pub const DEFAULT_AUTH_SERVER: &str = "https://truecraft.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

const LOGIN_PATH: &str = "/api/login";

/// Talks to the auth server's `/api/login` endpoint.
///
/// One handler serves one form; callers must not overlap `submit` calls on
/// the same instance (see `LoginForm`, which enforces it). The returned
/// `LoginResult` is a plain value; applying it to session or settings state
/// is up to whoever awaited it.
#[derive(Debug, Clone)]
pub struct LoginHandler {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl LoginHandler {
    pub fn new(auth_server: &str, timeout: Duration) -> Result<Self> {
        let endpoint = login_endpoint(auth_server)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("truecraft-launcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_encrypted(&self) -> bool {
        self.endpoint.scheme() == "https"
    }

    /// Runs one login attempt. Never panics or returns a transport error;
    /// every failure comes back as `LoginResult::Failure`.
    pub async fn submit(&self, credentials: &Credentials) -> LoginResult {
        match self.try_submit(credentials).await {
            Ok(session) => session.into(),
            Err(error) => error.into(),
        }
    }

    /// Same as `submit` with the error kind kept.
    pub async fn try_submit(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        if !credentials.is_complete() {
            return Err(LoginError::MissingCredentials);
        }

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.post_login(credentials))
            .await
            .unwrap_or(Err(LoginError::Timeout(self.timeout)));

        match &outcome {
            Ok(session) => o_debug!(
                "   login ok for {} in {}ms",
                session.username,
                started.elapsed().as_millis()
            ),
            Err(error) => o_debug!(
                "   login failed in {}ms: {}",
                started.elapsed().as_millis(),
                error
            ),
        }
        outcome
    }

    async fn post_login(&self, credentials: &Credentials) -> Result<Session, LoginError> {
        o_debug!("   POST {} (user={})", self.endpoint, credentials.username);

        let res = self
            .client
            .post(self.endpoint.clone())
            .form(&LoginRequest::from(credentials))
            .send()
            .await
            .map_err(|error| self.classify(error))?;

        self.handle_response(res).await
    }

    async fn handle_response(&self, res: Response) -> Result<Session, LoginError> {
        let status = res.status();
        o_debug!("   <- {}", status);

        let body = res.text().await.map_err(|error| self.classify(error))?;
        if !status.is_success() {
            return Err(LoginError::Http {
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }
        parse_login_response(&body)
    }

    fn classify(&self, error: reqwest::Error) -> LoginError {
        if error.is_timeout() {
            LoginError::Timeout(self.timeout)
        } else {
            error.into()
        }
    }
}

/// `<auth-server>/api/login`, keeping any path prefix on the server URL.
fn login_endpoint(auth_server: &str) -> Result<Url> {
    let mut endpoint = Url::parse(auth_server.trim()).with_context(|| {
        format!("Auth server URL `{auth_server}` is invalid. Example: {DEFAULT_AUTH_SERVER}")
    })?;

    if !matches!(endpoint.scheme(), "https" | "http") {
        bail!("Auth server URL must use https (got `{}`)", endpoint.scheme());
    }
    if endpoint.host_str().is_none() {
        bail!("Auth server URL must include a host.");
    }

    let path = format!("{}{}", endpoint.path().trim_end_matches('/'), LOGIN_PATH);
    endpoint.set_path(&path);
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_from_bare_host() {
        let url = login_endpoint("https://truecraft.io").unwrap();
        assert_eq!(url.as_str(), "https://truecraft.io/api/login");
    }

    #[test]
    fn endpoint_keeps_prefix_and_drops_query() {
        let url = login_endpoint("https://example.com/auth/?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://example.com/auth/api/login");
    }

    #[test]
    fn endpoint_rejects_other_schemes() {
        assert!(login_endpoint("ftp://truecraft.io").is_err());
        assert!(login_endpoint("not a url").is_err());
    }

    #[test]
    fn encrypted_by_default() {
        let handler = LoginHandler::new(DEFAULT_AUTH_SERVER, DEFAULT_TIMEOUT).unwrap();
        assert!(handler.is_encrypted());
        assert_eq!(handler.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn empty_fields_fail_without_network() {
        // Port 9 on localhost: nothing listens, but validation must short-circuit first.
        let handler = LoginHandler::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
        for credentials in [
            Credentials::new("", "secret"),
            Credentials::new("alice", ""),
            Credentials::new("", ""),
        ] {
            assert_eq!(
                handler.try_submit(&credentials).await,
                Err(LoginError::MissingCredentials)
            );
        }
    }
}
