//! Create todo command implementation.

use anyhow::{Result, bail};
use clap::Args;

use todolink_core::NewTodo;
use todolink_http::Session;

use crate::output;
use crate::session::explain;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Todo title
    #[arg(long)]
    pub title: String,

    /// Todo description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Mark the todo as already completed
    #[arg(long)]
    pub completed: bool,
}

pub async fn run(args: CreateArgs, session: &Session) -> Result<()> {
    let todo = NewTodo {
        completed: args.completed,
        ..NewTodo::new(args.title, args.description)
    };

    let response = session
        .create_todo(&todo)
        .await
        .map_err(|e| explain(e, "create todo"))?;
    if !response.success {
        bail!("Server refused to create the todo: {}", response.message);
    }

    output::success("Todo created");
    Ok(())
}
