//! Recovery from expired access tokens.
//!
//! At most one refresh is in flight at a time. The first request that sees a
//! 401/403 starts it; requests that fail while it runs wait for the same
//! result and retry with the token it produced. A request that fails after
//! the tokens were already rotated retries with the current token without
//! refreshing again. A logout while the refresh runs wins: the new tokens
//! are discarded.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Notify, OnceCell};
use tracing::{debug, error, info, warn};

use todolink_core::{AccessToken, CredentialStore, SessionEventBus, TokenRefresher};

/// What the pipeline should do after a 401/403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Retry the original request once with this token.
    Retry(AccessToken),
    /// Return the original failed response; the session has ended.
    GiveUp,
}

/// A write-once result shared by every request waiting on one refresh.
struct InFlightRefresh {
    result: OnceCell<Recovery>,
    notify: Notify,
}

impl InFlightRefresh {
    fn new() -> Self {
        Self {
            result: OnceCell::new(),
            notify: Notify::new(),
        }
    }

    fn set_result(&self, result: Recovery) {
        let _ = self.result.set(result);
        self.notify.notify_waiters();
    }

    async fn wait(&self) -> Recovery {
        loop {
            if let Some(result) = self.result.get() {
                return result.clone();
            }

            let notified = self.notify.notified();
            if let Some(result) = self.result.get() {
                return result.clone();
            }

            notified.await;
        }
    }
}

/// Serializes token refreshes across concurrent pipeline calls.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    events: SessionEventBus,
    in_flight: Mutex<Option<Arc<InFlightRefresh>>>,
}

impl RefreshCoordinator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        events: SessionEventBus,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                store,
                refresher,
                events,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Decide how to recover from a 401/403 on a request that was sent with
    /// `sent_with`.
    ///
    /// Blocks until the in-flight refresh (started here or by another
    /// request) completes.
    pub async fn recover(&self, sent_with: Option<&AccessToken>) -> Recovery {
        let flight = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match slot.as_ref() {
                Some(flight) => {
                    debug!("Joining in-flight token refresh");
                    Arc::clone(flight)
                }
                None => {
                    if let Some(current) = self.inner.store.access_token()
                        && !current.is_empty()
                        && sent_with != Some(&current)
                    {
                        debug!("Access token already rotated, retrying without refresh");
                        return Recovery::Retry(current);
                    }

                    let flight = Arc::new(InFlightRefresh::new());
                    *slot = Some(Arc::clone(&flight));

                    let guard = FlightGuard {
                        inner: Arc::clone(&self.inner),
                        flight: Arc::clone(&flight),
                        outcome: None,
                    };
                    // Runs detached so a caller dropping its future cannot
                    // strand the other waiters.
                    tokio::spawn(guard.run());
                    flight
                }
            }
        };

        flight.wait().await
    }
}

/// Publishes the flight result and frees the slot when dropped, including
/// when the refresh task panics or is cancelled.
struct FlightGuard {
    inner: Arc<CoordinatorInner>,
    flight: Arc<InFlightRefresh>,
    outcome: Option<Recovery>,
}

impl FlightGuard {
    async fn run(mut self) {
        let outcome = self.inner.refresh().await;
        self.outcome = Some(outcome);
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let outcome = match self.outcome.take() {
            Some(outcome) => outcome,
            None => {
                error!("Token refresh did not complete, ending session");
                self.inner.events.force_logout();
                Recovery::GiveUp
            }
        };
        {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if slot
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &self.flight))
            {
                *slot = None;
            }
        }
        self.flight.set_result(outcome);
    }
}

impl CoordinatorInner {
    async fn refresh(&self) -> Recovery {
        let generation = self.events.logout_generation();
        let Some(refresh_token) = self.store.refresh_token() else {
            warn!("No refresh token stored, ending session");
            self.events.force_logout();
            return Recovery::GiveUp;
        };

        info!("Refreshing access token");
        match self.refresher.refresh(&refresh_token).await {
            Ok(tokens) => match self.events.save_tokens_since(generation, &tokens) {
                Ok(true) => {
                    debug!("Token refresh succeeded");
                    Recovery::Retry(tokens.access)
                }
                Ok(false) => {
                    info!("Logged out during token refresh, discarding new tokens");
                    Recovery::GiveUp
                }
                Err(e) => {
                    error!(error = %e, "Failed to persist refreshed tokens, ending session");
                    self.events.force_logout();
                    Recovery::GiveUp
                }
            },
            Err(e) => {
                warn!(error = %e, "Token refresh failed, ending session");
                self.events.force_logout();
                Recovery::GiveUp
            }
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let in_flight = self
            .inner
            .in_flight
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false);
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &in_flight)
            .finish()
    }
}
