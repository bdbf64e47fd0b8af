//! Building a client session from the global options.

pub mod storage;

use anyhow::{Context, Result, anyhow};

use todolink_core::ApiUrl;
use todolink_core::error::{AuthError, Error};
use todolink_http::{ClientConfig, Session};

use crate::cli::GlobalArgs;

/// Open the store and connect a session to the configured API.
pub fn connect(globals: &GlobalArgs) -> Result<Session> {
    let api = globals
        .api
        .as_deref()
        .context("No API URL. Pass --api or set TODOLINK_API.")?;
    let api = ApiUrl::new(api).context("Invalid API URL")?;

    let store = storage::open_store(globals.store.as_deref())?;
    Session::new(ClientConfig::new(api), store).context("Failed to create session")
}

/// Explain a failed API call, calling out a session that ended during it.
pub fn explain(err: Error, action: &str) -> anyhow::Error {
    if matches!(err, Error::Auth(AuthError::SessionExpired)) {
        return anyhow!("Session expired. Run 'todolink login' to sign in again.");
    }
    anyhow::Error::new(err).context(format!("Failed to {}", action))
}
