//! Request and response values carried through the pipeline.

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use todolink_core::Result;
use todolink_core::error::{Error, InvalidInputError, ProtocolError};

use crate::endpoints::ErrorResponse;

/// Description of an outbound API call.
///
/// A retry is built from a clone of the original description, never by
/// replaying a response.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| InvalidInputError::Other {
            message: format!("cannot encode request body: {}", e),
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value.
    ///
    /// The header value is marked sensitive so it is hidden from Debug output.
    pub fn set_bearer(&mut self, token: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::InvalidInput(InvalidInputError::HeaderValue))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// A received response with its body fully buffered.
///
/// Buffering at receipt releases the connection. Reading the body consumes
/// the value.
#[derive(Debug)]
pub struct InboundResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> reqwest::Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ProtocolError::new(
                self.status.as_u16(),
                Some(format!("invalid response body: {}", e)),
            )
            .into()
        })
    }

    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Pass a 2xx response through; anything else becomes a protocol error
    /// carrying the server's message when one can be found.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status.as_u16();
        let message = match serde_json::from_slice::<ErrorResponse>(&self.body) {
            Ok(body) => body.message.or(body.error),
            Err(_) => {
                let text = self.text();
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        };
        Err(ProtocolError::new(status, message).into())
    }
}
