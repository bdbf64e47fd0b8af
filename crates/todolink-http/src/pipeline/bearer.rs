//! Attaches the stored access token to outbound requests.

use std::sync::Arc;

use todolink_core::{AccessToken, CredentialStore, Result};

use crate::request::OutboundRequest;

/// Sets `Authorization: Bearer <token>` from the credential store.
///
/// With no stored token the header is still sent as `Bearer ` with an empty
/// token; the server answers 401 and the refresh path takes over.
#[derive(Clone)]
pub struct BearerInjector {
    store: Arc<dyn CredentialStore>,
}

impl BearerInjector {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Decorate `request` and return the token it now carries.
    pub fn apply(&self, request: &mut OutboundRequest) -> Result<Option<AccessToken>> {
        let token = self.store.access_token();
        let value = token.as_ref().map(AccessToken::as_str).unwrap_or_default();
        request.set_bearer(value)?;
        Ok(token)
    }

    /// Decorate `request` with a known token, bypassing the store.
    pub fn with_token(request: &mut OutboundRequest, token: &AccessToken) -> Result<()> {
        request.set_bearer(token.as_str())
    }
}

impl std::fmt::Debug for BearerInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerInjector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use reqwest::header::AUTHORIZATION;
    use todolink_core::{MemoryStore, StorageKey};

    use super::*;

    fn request() -> OutboundRequest {
        OutboundRequest::new(Method::GET, "https://example.com/todos")
    }

    #[test]
    fn attaches_stored_token() {
        let store = Arc::new(MemoryStore::with_values([(StorageKey::AccessToken, "A1")]));
        let injector = BearerInjector::new(store);

        let mut request = request();
        let sent = injector.apply(&mut request).unwrap();

        assert_eq!(request.header(&AUTHORIZATION), Some("Bearer A1"));
        assert_eq!(sent, Some(AccessToken::new("A1")));
    }

    #[test]
    fn missing_token_still_sends_empty_bearer() {
        let injector = BearerInjector::new(Arc::new(MemoryStore::new()));

        let mut request = request();
        let sent = injector.apply(&mut request).unwrap();

        assert_eq!(request.header(&AUTHORIZATION), Some("Bearer "));
        assert_eq!(sent, None);
    }

    #[test]
    fn reads_the_store_on_every_call() {
        let store = Arc::new(MemoryStore::with_values([(StorageKey::AccessToken, "A1")]));
        let injector = BearerInjector::new(store.clone());

        store.set(StorageKey::AccessToken, "A2").unwrap();
        let mut request = request();
        injector.apply(&mut request).unwrap();

        assert_eq!(request.header(&AUTHORIZATION), Some("Bearer A2"));
    }

    #[test]
    fn with_token_overrides_existing_header() {
        let mut request = request();
        request.set_bearer("A1").unwrap();

        BearerInjector::with_token(&mut request, &AccessToken::new("A2")).unwrap();

        assert_eq!(request.header(&AUTHORIZATION), Some("Bearer A2"));
    }
}
