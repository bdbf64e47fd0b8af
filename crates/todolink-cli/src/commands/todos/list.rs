//! List todos command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use todolink_http::Session;

use crate::output;
use crate::session::explain;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, session: &Session) -> Result<()> {
    let todos = session
        .list_todos()
        .await
        .map_err(|e| explain(e, "list todos"))?;

    if todos.is_empty() {
        eprintln!("{}", "No todos found.".dimmed());
        return Ok(());
    }

    for todo in &todos {
        if args.json {
            output::json(todo)?;
        } else {
            output::todo_line(todo);
        }
    }

    Ok(())
}
