//! todolink-http - Authenticated request pipeline for the todo API.
//!
//! Every call to the protected todo endpoints goes through a
//! [`RequestPipeline`]: the bearer token is attached from the credential
//! store, and a 401/403 triggers one coordinated token refresh followed by a
//! single retry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todolink_core::{ApiUrl, LoginCredentials, MemoryStore};
//! use todolink_http::{ClientConfig, Session};
//!
//! # async fn example() -> Result<(), todolink_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://todos.example.com")?);
//! let session = Session::new(config, Arc::new(MemoryStore::new()))?;
//!
//! if session.login(&LoginCredentials::new("alice@example.com", "pw")).await? {
//!     for todo in session.list_todos().await? {
//!         println!("{}: {}", todo.todo_id, todo.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod endpoints;
mod pipeline;
mod request;
mod session;
mod todos;

pub use auth::AuthGateway;
pub use client::ApiClient;
pub use endpoints::GenericResponse;
pub use pipeline::{BearerInjector, Recovery, RefreshCoordinator, RequestPipeline};
pub use request::{InboundResponse, OutboundRequest};
pub use session::{ClientConfig, Session};
pub use todos::TodoGateway;
