//! Register command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use todolink_core::Registration;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, globals: &GlobalArgs) -> Result<()> {
    let session = session::connect(globals)?;
    let registration = Registration::new(&args.username, &args.email, &args.password);

    let ok = session
        .register(&registration)
        .await
        .context("Failed to register")?;
    if !ok {
        bail!("Registration rejected by the server.");
    }

    output::success("Account created");
    println!();
    output::field("Username", &args.username);
    output::field("Email", &args.email);
    eprintln!();
    eprintln!("Run 'todolink login' to sign in.");

    Ok(())
}
