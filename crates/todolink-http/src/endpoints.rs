//! Endpoint paths and request/response bodies.

use serde::{Deserialize, Serialize};

use todolink_core::TokenPair;

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const LOGIN: &str = "auth/login";

pub const REGISTER: &str = "auth/register";

pub const REFRESH: &str = "auth/refresh";

/// Default collection path of the todo resource.
pub const TODOS: &str = "todos";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from login and refresh.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        TokenPair::new(response.access_token, response.refresh_token)
    }
}

/// Response from register and the todo mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
