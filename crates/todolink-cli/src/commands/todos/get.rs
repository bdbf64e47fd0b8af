//! Get todo command implementation.

use anyhow::Result;
use clap::Args;

use todolink_core::TodoId;
use todolink_http::Session;

use crate::output;
use crate::session::explain;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Todo ID
    pub id: TodoId,

    /// Print the todo as pretty JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GetArgs, session: &Session) -> Result<()> {
    let todo = session
        .get_todo(args.id)
        .await
        .map_err(|e| explain(e, "get todo"))?;

    if args.json {
        output::json_pretty(&todo)?;
    } else {
        output::todo_detail(&todo);
    }

    Ok(())
}
