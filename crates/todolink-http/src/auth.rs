//! Calls to the unauthenticated auth endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use todolink_core::error::AuthError;
use todolink_core::{
    CredentialStore, LoginCredentials, RefreshToken, Registration, Result, TokenPair,
    TokenRefresher,
};

use crate::client::ApiClient;
use crate::endpoints::{GenericResponse, LOGIN, REFRESH, REGISTER, RefreshTokenRequest, TokenResponse};

/// Login, registration and token refresh.
///
/// These calls bypass the request pipeline. Only `login` writes to the
/// credential store; `refresh` returns the new pair and leaves persistence
/// to its caller.
#[derive(Clone)]
pub struct AuthGateway {
    client: ApiClient,
    store: Arc<dyn CredentialStore>,
}

impl AuthGateway {
    pub fn new(client: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self { client, store }
    }

    /// Log in and persist the issued tokens.
    ///
    /// Returns `Ok(false)` when the server rejects the login.
    ///
    /// # Errors
    ///
    /// Transport failures, an undecodable success body, or a failure to
    /// persist the tokens.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<bool> {
        info!("Logging in");

        let response = self.client.post_json(LOGIN, credentials).await?;
        if !response.is_success() {
            warn!(status = %response.status(), "Login rejected");
            return Ok(false);
        }

        let tokens: TokenPair = response.json::<TokenResponse>()?.into();
        self.store.save_tokens(&tokens)?;

        debug!("Login succeeded, tokens stored");
        Ok(true)
    }

    /// Create an account. Returns the server-reported success flag.
    #[instrument(skip(self, registration), fields(username = %registration.username()))]
    pub async fn register(&self, registration: &Registration) -> Result<bool> {
        info!("Registering account");

        let response = self.client.post_json(REGISTER, registration).await?;
        if !response.is_success() {
            warn!(status = %response.status(), "Registration rejected");
            return Ok(false);
        }

        let success = response
            .json::<GenericResponse>()
            .map(|body| body.success)
            .unwrap_or(false);
        Ok(success)
    }

    /// Exchange a refresh token for a new pair. Does not touch the store.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.as_str(),
        };

        let response = self.client.post_json(REFRESH, &request).await?;
        if !response.is_success() {
            return Err(AuthError::RefreshFailed {
                reason: format!("HTTP {}", response.status().as_u16()),
            }
            .into());
        }

        let tokens = response.json::<TokenResponse>()?;
        debug!("Refresh endpoint issued new tokens");
        Ok(tokens.into())
    }
}

#[async_trait]
impl TokenRefresher for AuthGateway {
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        AuthGateway::refresh(self, refresh_token).await
    }
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("api", self.client.api())
            .finish()
    }
}
