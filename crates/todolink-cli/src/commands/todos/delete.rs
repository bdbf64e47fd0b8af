//! Delete todo command implementation.

use anyhow::{Result, bail};
use clap::Args;

use todolink_core::TodoId;
use todolink_http::Session;

use crate::output;
use crate::session::explain;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Todo ID
    pub id: TodoId,
}

pub async fn run(args: DeleteArgs, session: &Session) -> Result<()> {
    let response = session
        .delete_todo(args.id)
        .await
        .map_err(|e| explain(e, "delete todo"))?;
    if !response.success {
        bail!("Server refused to delete the todo: {}", response.message);
    }

    output::success(&format!("Todo #{} deleted", args.id));
    Ok(())
}
