//! Session facade wiring store, events, auth and the todo gateway.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use todolink_core::error::AuthError;
use todolink_core::{
    ApiUrl, CredentialStore, Error, LoginCredentials, NewTodo, Preferences, Registration, Result,
    SessionEventBus, SessionState, TodoId, TodoItem,
};

use crate::auth::AuthGateway;
use crate::client::ApiClient;
use crate::endpoints::{GenericResponse, TODOS};
use crate::pipeline::RequestPipeline;
use crate::todos::TodoGateway;

/// Where the API lives.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    pub api: ApiUrl,
    /// Path of the todo collection relative to `api`.
    pub todos_path: String,
}

impl ClientConfig {
    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            todos_path: TODOS.to_string(),
        }
    }

    pub fn with_todos_path(mut self, path: impl Into<String>) -> Self {
        self.todos_path = path.into();
        self
    }
}

/// A client session against one API.
///
/// Owns one [`SessionEventBus`] and hands it, with the credential store, to
/// every component. Cheap to clone.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todolink_core::{ApiUrl, MemoryStore, NewTodo};
/// use todolink_http::{ClientConfig, Session};
///
/// # async fn example() -> Result<(), todolink_core::Error> {
/// let config = ClientConfig::new(ApiUrl::new("https://todos.example.com")?);
/// let session = Session::new(config, Arc::new(MemoryStore::new()))?;
///
/// let mut logged_out = session.events().subscribe_auth_state();
/// session.create_todo(&NewTodo::new("milk", "2 litres")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    events: SessionEventBus,
    preferences: Preferences,
    auth: AuthGateway,
    todos: TodoGateway,
}

impl Session {
    /// Build a session over `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = ApiClient::new(config.api)?;
        let events = SessionEventBus::new(store.clone());
        let auth = AuthGateway::new(client.clone(), store.clone());
        let pipeline = RequestPipeline::new(
            client,
            store.clone(),
            Arc::new(auth.clone()),
            events.clone(),
        );
        let todos = TodoGateway::new(pipeline, config.todos_path);

        debug!(state = ?events.initial_state(), "Session created");

        Ok(Self {
            inner: Arc::new(SessionInner {
                events,
                preferences: Preferences::new(store),
                auth,
                todos,
            }),
        })
    }

    pub fn events(&self) -> &SessionEventBus {
        &self.inner.events
    }

    pub fn preferences(&self) -> &Preferences {
        &self.inner.preferences
    }

    pub fn todos(&self) -> &TodoGateway {
        &self.inner.todos
    }

    /// True iff an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.events.is_authenticated()
    }

    /// State derived from the store, for use at startup.
    pub fn state(&self) -> SessionState {
        self.inner.events.initial_state()
    }

    /// Log in; on success tokens are stored and `true` is published.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<bool> {
        let ok = self.inner.auth.login(credentials).await?;
        if ok {
            self.inner.events.set_authenticated(true);
        }
        Ok(ok)
    }

    pub async fn register(&self, registration: &Registration) -> Result<bool> {
        self.inner.auth.register(registration).await
    }

    /// Clear stored tokens and publish `false`.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        info!("Logging out");
        self.inner.events.force_logout();
    }

    pub async fn list_todos(&self) -> Result<Vec<TodoItem>> {
        self.inner.todos.list().await.map_err(|e| self.expired(e))
    }

    pub async fn get_todo(&self, id: TodoId) -> Result<TodoItem> {
        self.inner.todos.get(id).await.map_err(|e| self.expired(e))
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> Result<GenericResponse> {
        let response = self
            .inner
            .todos
            .create(todo)
            .await
            .map_err(|e| self.expired(e))?;
        self.inner.events.notify_resource_list_changed(true);
        Ok(response)
    }

    pub async fn update_todo(&self, todo: &TodoItem) -> Result<GenericResponse> {
        let response = self
            .inner
            .todos
            .update(todo)
            .await
            .map_err(|e| self.expired(e))?;
        self.inner.events.notify_resource_list_changed(true);
        Ok(response)
    }

    pub async fn delete_todo(&self, id: TodoId) -> Result<GenericResponse> {
        let response = self
            .inner
            .todos
            .delete(id)
            .await
            .map_err(|e| self.expired(e))?;
        self.inner.events.notify_resource_list_changed(true);
        Ok(response)
    }

    /// A rejected call after the session was ended is a session expiry.
    fn expired(&self, err: Error) -> Error {
        if matches!(err, Error::Protocol(_)) && err.is_auth_error() && !self.is_authenticated() {
            return AuthError::SessionExpired.into();
        }
        err
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth", &self.inner.auth)
            .field("state", &self.inner.events.current_state())
            .finish()
    }
}
