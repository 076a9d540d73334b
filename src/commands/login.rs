use std::time::Duration;

use anyhow::{anyhow, Result};
use colored::Colorize;
use truecraft_launcher::{Credentials, FileCredentialStore, LoginForm, LoginHandler, LoginResult};

use crate::prompt;

pub struct LoginArgs {
    pub username: Option<String>,
    /// `None` asks (or keeps the remembered setting when auto-logging in).
    pub remember: Option<bool>,
    pub print_session: bool,
}

pub async fn handle_login(auth_server: &str, timeout: Duration, args: LoginArgs) -> Result<()> {
    let handler = LoginHandler::new(auth_server, timeout)?;
    if !handler.is_encrypted() {
        o_warn!(
            "{} {} is not https; the password will be sent unencrypted.",
            "Warning:".yellow().bold(),
            handler.endpoint()
        );
    }
    let server = handler.endpoint().host_str().unwrap_or_default().to_string();

    let store = FileCredentialStore::default_location()?;
    o_debug!("   settings: {}", store.path().display());
    let mut form = LoginForm::new(handler, store)?;
    let prefill = form.prefill().clone();

    let (credentials, remember_me) = if args.username.is_none() && prefill.can_auto_login() {
        o_detail!("Using remembered credentials for {}", prefill.username.cyan());
        (
            Credentials::new(&prefill.username, &prefill.password),
            args.remember.unwrap_or(true),
        )
    } else {
        let username = match args.username {
            Some(username) => username,
            None => prompt::username(&prefill.username)?,
        };
        let password = prompt::password()?;
        let remember_me = match args.remember {
            Some(remember) => remember,
            None => prompt::remember_me(prefill.auto_login)?,
        };
        (Credentials::new(username, password), remember_me)
    };

    o_step!("Logging in to {}...", server);
    match form.submit(credentials, remember_me).await? {
        LoginResult::Success {
            username,
            session_id,
        } => {
            o_success!("{}", format!("✔ Logged in as {}", username).green());
            if remember_me {
                o_detail!("Password remembered. Next `truecraft login` signs in automatically.");
            }
            if args.print_session {
                o_result!("{}", session_id);
            }
            Ok(())
        }
        LoginResult::Failure { message } => Err(anyhow!(message)),
    }
}
