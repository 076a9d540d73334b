use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

fn read_line() -> Result<String> {
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Username with the remembered one as default.
pub fn username(remembered: &str) -> Result<String> {
    if remembered.is_empty() {
        o_print!("Username: ");
    } else {
        o_print!("Username [{}]: ", remembered.dimmed());
    }
    let input = read_line()?;
    if input.is_empty() {
        Ok(remembered.to_string())
    } else {
        Ok(input)
    }
}

pub fn password() -> Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}

/// "Remember me" checkbox; Enter keeps the current setting.
pub fn remember_me(current: bool) -> Result<bool> {
    let hint = if current { "Y/n" } else { "y/N" };
    o_print!("Remember me? [{}]: ", hint);
    let input = read_line()?.to_lowercase();
    Ok(match input.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => current,
    })
}
