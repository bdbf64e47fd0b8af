//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use todolink_core::LoginCredentials;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, globals: &GlobalArgs) -> Result<()> {
    let session = session::connect(globals)?;
    let credentials = LoginCredentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let ok = session
        .login(&credentials)
        .await
        .context("Failed to login")?;
    if !ok {
        bail!("Login rejected. Check your email and password.");
    }

    output::success("Logged in successfully");
    println!();
    output::field("Email", &args.email);
    if let Some(api) = &globals.api {
        output::field("API", api);
    }

    Ok(())
}
