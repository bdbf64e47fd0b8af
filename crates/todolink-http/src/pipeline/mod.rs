//! The authenticated request pipeline.
//!
//! Every call to the protected API runs two stages around the network:
//! [`BearerInjector`] before it and [`RefreshCoordinator`] after it. The
//! retry bound is structural: [`RequestPipeline::execute`] sends at most two
//! requests and never inspects the second response.

mod bearer;
mod refresh;

pub use bearer::BearerInjector;
pub use refresh::{Recovery, RefreshCoordinator};

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, instrument};

use todolink_core::{CredentialStore, Result, SessionEventBus, TokenRefresher};

use crate::client::ApiClient;
use crate::request::{InboundResponse, OutboundRequest};

/// Statuses that mean the access token was not accepted.
fn is_expiry_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Sends requests to the protected API with token attach and refresh-retry.
#[derive(Clone)]
pub struct RequestPipeline {
    client: ApiClient,
    injector: BearerInjector,
    coordinator: RefreshCoordinator,
}

impl RequestPipeline {
    pub fn new(
        client: ApiClient,
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        events: SessionEventBus,
    ) -> Self {
        Self {
            client,
            injector: BearerInjector::new(store.clone()),
            coordinator: RefreshCoordinator::new(store, refresher, events),
        }
    }

    /// Send `request` with the stored bearer token.
    ///
    /// On 401/403 the token is refreshed (or the in-flight refresh joined)
    /// and the request is sent once more with the new token; that second
    /// response is returned whatever its status. If no new token can be
    /// obtained the session is logged out and the original response is
    /// returned. Any other status is returned unchanged.
    ///
    /// # Errors
    ///
    /// Transport failures of either send, or a token that is not a valid
    /// header value.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: OutboundRequest) -> Result<InboundResponse> {
        let mut first = request.clone();
        let sent_with = self.injector.apply(&mut first)?;

        let response = self.client.send(&first).await?;
        if !is_expiry_status(response.status()) {
            return Ok(response);
        }

        debug!(status = %response.status(), "Access token rejected");

        match self.coordinator.recover(sent_with.as_ref()).await {
            Recovery::Retry(token) => {
                let mut retry = request;
                BearerInjector::with_token(&mut retry, &token)?;
                debug!("Retrying with refreshed token");
                self.client.send(&retry).await
            }
            Recovery::GiveUp => Ok(response),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("api", self.client.api())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
