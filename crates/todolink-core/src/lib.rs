//! todolink-core - Core types, traits and session events.
//!
//! Everything that does not touch the network lives here: bearer tokens,
//! login credentials, the error taxonomy, the credential store contract and
//! the session event bus that the request pipeline publishes to.

pub mod credentials;
pub mod error;
pub mod events;
pub mod settings;
pub mod store;
pub mod todo;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{LoginCredentials, Registration};
pub use error::Error;
pub use events::{SessionEventBus, SessionState};
pub use settings::{Language, Preferences, Theme};
pub use store::{MemoryStore, StorageKey};
pub use todo::{NewTodo, TodoId, TodoItem};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{CredentialStore, TokenRefresher};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
