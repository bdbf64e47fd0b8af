//! HTTP client for the todo API.

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use todolink_core::error::{Error, TransportError};
use todolink_core::{ApiUrl, Result};

use crate::request::{InboundResponse, OutboundRequest};

/// Map a reqwest failure onto the transport error taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// Thin wrapper over a shared `reqwest::Client` bound to one API base URL.
///
/// Sends requests as-is; it knows nothing about tokens.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    /// Create a new client for the given API.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("todolink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;

        Ok(Self { client, api })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        self.api.endpoint(path)
    }

    /// Send a request and buffer its response.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn send(&self, request: &OutboundRequest) -> Result<InboundResponse> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(transport)?;
        trace!(status = %response.status(), "HTTP response");

        InboundResponse::read(response).await.map_err(transport)
    }

    /// POST a JSON body to an endpoint without credentials.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<InboundResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = OutboundRequest::new(Method::POST, self.url(path)).json(body)?;
        debug!(path, "Unauthenticated POST");
        self.send(&request).await
    }
}
