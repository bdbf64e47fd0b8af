//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::settings::SettingsCommand;
use crate::commands::todos::TodosCommand;
use crate::commands::{login, logout, register, status};

/// Command-line client for the todolink API.
#[derive(Parser, Debug)]
#[command(name = "todolink")]
#[command(author, version = env!("TODOLINK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, global = true, env = "TODOLINK_API")]
    pub api: Option<String>,

    /// Credential store file (defaults to the user data directory)
    #[arg(long, global = true, env = "TODOLINK_STORE")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session tokens
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Show whether a session is stored
    Status(status::StatusArgs),

    /// Todo operations
    Todos(TodosCommand),

    /// Local preferences
    Settings(SettingsCommand),
}
