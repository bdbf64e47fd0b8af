//! Update todo command implementation.

use anyhow::{Result, bail};
use clap::Args;

use todolink_core::TodoId;
use todolink_http::Session;

use crate::output;
use crate::session::explain;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Todo ID
    pub id: TodoId,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New completion state (true or false)
    #[arg(long)]
    pub completed: Option<bool>,
}

pub async fn run(args: UpdateArgs, session: &Session) -> Result<()> {
    if args.title.is_none() && args.description.is_none() && args.completed.is_none() {
        bail!("Nothing to update. Pass --title, --description or --completed.");
    }

    let mut todo = session
        .get_todo(args.id)
        .await
        .map_err(|e| explain(e, "get todo"))?;

    if let Some(title) = args.title {
        todo.title = title;
    }
    if let Some(description) = args.description {
        todo.description = description;
    }
    if let Some(completed) = args.completed {
        todo.completed = completed;
    }

    let response = session
        .update_todo(&todo)
        .await
        .map_err(|e| explain(e, "update todo"))?;
    if !response.success {
        bail!("Server refused to update the todo: {}", response.message);
    }

    output::success(&format!("Todo #{} updated", todo.todo_id));
    Ok(())
}
