#[macro_use]
extern crate truecraft_launcher;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use truecraft_launcher::api::DEFAULT_AUTH_SERVER;
use truecraft_launcher::output::{self, Verbosity};

mod commands;
mod prompt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Auth server base URL
    #[arg(long, global = true, env = "TRUECRAFT_AUTH_SERVER", default_value = DEFAULT_AUTH_SERVER)]
    auth_server: String,

    /// Give up on the login server after this long (e.g. 10s, 1m)
    #[arg(long, global = true, env = "TRUECRAFT_LOGIN_TIMEOUT", default_value = "25s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Only print errors and requested results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print request details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, using remembered credentials when auto-login is on
    Login {
        /// Log in as this user instead of the remembered one
        #[arg(short, long)]
        username: Option<String>,
        /// Remember the password and log in automatically next time
        #[arg(long, conflicts_with = "no_remember")]
        remember: bool,
        /// Forget the password after this login
        #[arg(long)]
        no_remember: bool,
        /// Print the session id to stdout on success
        #[arg(long)]
        print_session: bool,
    },

    /// Forget the remembered password and turn off auto-login
    Logout,

    /// Show where to create an account
    Register,

    /// Show the remembered account
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let result = match &cli.command {
        Commands::Login {
            username,
            remember,
            no_remember,
            print_session,
        } => {
            let remember = match (*remember, *no_remember) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            };
            commands::login::handle_login(
                &cli.auth_server,
                cli.timeout,
                commands::login::LoginArgs {
                    username: username.clone(),
                    remember,
                    print_session: *print_session,
                },
            )
            .await
        }
        Commands::Logout => commands::logout::handle_logout().await,
        Commands::Register => commands::register::handle_register().await,
        Commands::Whoami => commands::whoami::handle_whoami().await,
    };

    if let Err(e) = result {
        o_error!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
