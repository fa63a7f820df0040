// Authentication wire types

use serde::{Deserialize, Serialize};

/// Body of the token refresh call.
#[derive(Serialize)]
pub struct RefreshRequest {
    pub grant_type: String,
    pub refresh_token: String,
    pub client_id: String,
}

/// Token refresh response.
///
/// A response that deserializes but carries an empty `access_token` is
/// still treated as refresh failure.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

/// Claims carried in the bearer token payload. Only the subject is used.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    #[serde(alias = "user_id", alias = "userId")]
    pub sub: Option<String>,
}
