//! todolink - command-line client for the todolink API.
//!
//! This is a thin wrapper over `todolink-http`, storing its session in a
//! JSON credential file shared between invocations.

mod cli;
mod commands;
mod output;
mod session;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{login, logout, register, settings, status, todos};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let globals = cli.globals;
    match cli.command {
        Commands::Login(args) => login::run(args, &globals).await,
        Commands::Register(args) => register::run(args, &globals).await,
        Commands::Logout(args) => logout::run(args, &globals),
        Commands::Status(args) => status::run(args, &globals),
        Commands::Todos(cmd) => todos::handle(cmd, &globals).await,
        Commands::Settings(cmd) => settings::handle(cmd, &globals),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays parseable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
