//! Core traits at the seams between storage, auth and the request pipeline.

mod refresher;
mod store;

pub use refresher::TokenRefresher;
pub use store::CredentialStore;
