//! Status command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use todolink_core::{SessionEventBus, SessionState};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, globals: &GlobalArgs) -> Result<()> {
    let path = storage::store_path(globals.store.as_deref())?;
    let store = storage::open_store(Some(path.as_path()))?;
    let events = SessionEventBus::new(store);

    let state = match events.initial_state() {
        SessionState::Authenticated => "logged in".green(),
        SessionState::Unauthenticated => "logged out".yellow(),
    };

    output::field("Session", &state.to_string());
    output::field("Store", &path.display().to_string());
    if let Some(api) = &globals.api {
        output::field("API", api);
    }

    Ok(())
}
