use anyhow::{Context, Result};
use colored::Colorize;
use truecraft_launcher::{CredentialStore, FileCredentialStore};

pub async fn handle_logout() -> Result<()> {
    let store = FileCredentialStore::default_location()?;
    let remembered = store.load().context("Could not load settings file.")?;

    if !remembered.auto_login && remembered.password.is_empty() {
        o_warn!("{}", "No remembered password to forget.".yellow());
        return Ok(());
    }

    store.forget().context("Failed to clear remembered password.")?;
    o_success!("{}", "✔ Remembered password cleared. Auto-login is off.".green());
    Ok(())
}
