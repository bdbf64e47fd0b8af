//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use todolink_core::SessionEventBus;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, globals: &GlobalArgs) -> Result<()> {
    let store = storage::open_store(globals.store.as_deref())?;
    let events = SessionEventBus::new(store);

    if !events.is_authenticated() {
        output::success("Already logged out");
        return Ok(());
    }

    events.force_logout();
    output::success("Logged out");
    Ok(())
}
