//! Token refresh trait.

use async_trait::async_trait;

use crate::Result;
use crate::tokens::{RefreshToken, TokenPair};

/// Exchanges a refresh token for a new token pair.
///
/// Implementations must not touch the credential store; persisting the
/// rotated pair is the caller's job. Any `Err` means the refresh failed.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair>;
}
