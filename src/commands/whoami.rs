use anyhow::{Context, Result};
use colored::Colorize;
use truecraft_launcher::{CredentialStore, FileCredentialStore};

pub async fn handle_whoami() -> Result<()> {
    let store = FileCredentialStore::default_location()?;
    let remembered = store.load().context("Could not load settings file.")?;

    if remembered.username.is_empty() {
        o_step!("{}", "No remembered account. Run `truecraft login` first.".yellow());
        return Ok(());
    }

    o_result!("{}", remembered.username);
    let auto_login = if remembered.can_auto_login() { "on".green() } else { "off".dimmed() };
    o_detail!("  {} {}", "Auto-login:".bold(), auto_login);
    o_detail!("  {}   {}", "Settings:".bold(), store.path().display());
    Ok(())
}
