//! Todo subcommand implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;
use crate::session;

#[derive(Args, Debug)]
pub struct TodosCommand {
    #[command(subcommand)]
    pub command: TodosSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TodosSubcommand {
    /// List all todos
    List(list::ListArgs),

    /// Fetch a single todo
    Get(get::GetArgs),

    /// Create a new todo
    Create(create::CreateArgs),

    /// Change fields of a todo
    Update(update::UpdateArgs),

    /// Delete a todo
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: TodosCommand, globals: &GlobalArgs) -> Result<()> {
    let session = session::connect(globals)?;
    if !session.is_authenticated() {
        bail!("No active session. Run 'todolink login' first.");
    }

    match cmd.command {
        TodosSubcommand::List(args) => list::run(args, &session).await,
        TodosSubcommand::Get(args) => get::run(args, &session).await,
        TodosSubcommand::Create(args) => create::run(args, &session).await,
        TodosSubcommand::Update(args) => update::run(args, &session).await,
        TodosSubcommand::Delete(args) => delete::run(args, &session).await,
    }
}
