//! Session state and change notifications.
//!
//! [`SessionEventBus`] is constructed once per process (or per session) and
//! handed to every component that needs it. It carries two independent
//! broadcast channels: the authentication state and a "todo list changed"
//! signal. Subscribers only observe events published after they subscribed.

use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::Result;
use crate::tokens::TokenPair;
use crate::traits::CredentialStore;

const BUFFER_CAPACITY: usize = 64;

/// Authentication state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        self == SessionState::Authenticated
    }
}

impl From<bool> for SessionState {
    fn from(authenticated: bool) -> Self {
        if authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

/// Broadcasts session transitions and owns the logout side effect.
///
/// Cheap to clone; clones share channels and state.
#[derive(Clone)]
pub struct SessionEventBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    store: Arc<dyn CredentialStore>,
    authenticated: AtomicBool,
    auth_state: broadcast::Sender<bool>,
    resource_list: broadcast::Sender<bool>,
    // Count of logouts. Token writes that must not outlive a logout hold
    // this lock together with the store write.
    logouts: Mutex<u64>,
}

impl SessionEventBus {
    /// Create a bus over `store`. The cached state starts from
    /// [`SessionEventBus::initial_state`].
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (auth_state, _) = broadcast::channel(BUFFER_CAPACITY);
        let (resource_list, _) = broadcast::channel(BUFFER_CAPACITY);
        let authenticated = Self::has_access_token(store.as_ref());

        Self {
            inner: Arc::new(BusInner {
                store,
                authenticated: AtomicBool::new(authenticated),
                auth_state,
                resource_list,
                logouts: Mutex::new(0),
            }),
        }
    }

    fn has_access_token(store: &dyn CredentialStore) -> bool {
        store.access_token().is_some_and(|token| !token.is_empty())
    }

    /// Returns true iff a non-empty access token is currently stored.
    ///
    /// This reads the store, not the cached flag, and is the check to use at
    /// startup.
    pub fn is_authenticated(&self) -> bool {
        Self::has_access_token(self.inner.store.as_ref())
    }

    /// The session state derived from the store.
    pub fn initial_state(&self) -> SessionState {
        self.is_authenticated().into()
    }

    /// The most recently published state.
    pub fn current_state(&self) -> SessionState {
        self.inner.authenticated.load(Ordering::SeqCst).into()
    }

    /// Clear both stored tokens and publish `false`.
    ///
    /// A storage failure is logged; the event is still published so the
    /// session is treated as logged out either way.
    pub fn force_logout(&self) {
        info!("Session ended, clearing stored tokens");
        {
            let mut logouts = self.lock_logouts();
            *logouts += 1;
            if let Err(e) = self.inner.store.clear_tokens() {
                warn!(error = %e, "Failed to clear stored tokens");
            }
        }
        self.publish_auth_state(false);
    }

    /// The number of logouts so far. Pass it to
    /// [`SessionEventBus::save_tokens_since`] to detect a logout in between.
    pub fn logout_generation(&self) -> u64 {
        *self.lock_logouts()
    }

    /// Persist `tokens` unless a logout happened after `generation` was read.
    ///
    /// Returns `Ok(false)` and leaves the store untouched if the session was
    /// ended in the meantime.
    pub fn save_tokens_since(&self, generation: u64, tokens: &TokenPair) -> Result<bool> {
        let logouts = self.lock_logouts();
        if *logouts != generation {
            debug!(generation, current = *logouts, "Logout since generation, not saving tokens");
            return Ok(false);
        }
        self.inner.store.save_tokens(tokens)?;
        Ok(true)
    }

    fn lock_logouts(&self) -> std::sync::MutexGuard<'_, u64> {
        self.inner
            .logouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish an authentication transition.
    ///
    /// `false` is [`SessionEventBus::force_logout`]; `true` only publishes.
    pub fn set_authenticated(&self, authenticated: bool) {
        if authenticated {
            self.publish_auth_state(true);
        } else {
            self.force_logout();
        }
    }

    fn publish_auth_state(&self, authenticated: bool) {
        self.inner
            .authenticated
            .store(authenticated, Ordering::SeqCst);
        // No subscribers is fine.
        let receivers = self.inner.auth_state.send(authenticated).unwrap_or(0);
        debug!(authenticated, receivers, "Published auth state");
    }

    /// Signal that the todo list changed. `false` is never propagated.
    pub fn notify_resource_list_changed(&self, changed: bool) {
        if changed {
            let receivers = self.inner.resource_list.send(true).unwrap_or(0);
            debug!(receivers, "Published resource list change");
        }
    }

    /// Subscribe to authentication transitions.
    pub fn subscribe_auth_state(&self) -> broadcast::Receiver<bool> {
        self.inner.auth_state.subscribe()
    }

    /// Subscribe to "todo list changed" signals.
    pub fn subscribe_resource_list(&self) -> broadcast::Receiver<bool> {
        self.inner.resource_list.subscribe()
    }
}

impl std::fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("state", &self.current_state())
            .finish()
    }
}
