// Token refresh logic

use anyhow::{Context, Result};
use reqwest::Client;

use super::types::{RefreshRequest, RefreshResponse};
use crate::config::ClientConfig;

/// Exchange the stored refresh token for a new access token.
///
/// Any HTTP error, unparsable body, or empty `access_token` is refresh
/// failure; the caller escalates to forced logout.
pub async fn refresh_access_token(
    client: &Client,
    config: &ClientConfig,
    refresh_token: &str,
) -> Result<RefreshResponse> {
    tracing::info!("Refreshing access token...");

    let url = config
        .auth_base_url
        .join("oauth2/token")
        .context("Failed to build token refresh URL")?;

    let request = RefreshRequest {
        grant_type: "refresh_token".to_string(),
        refresh_token: refresh_token.to_string(),
        client_id: config.client_id.clone(),
    };

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .context("Failed to send token refresh request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token refresh failed: {} - {}", status, error_text);
    }

    let data: RefreshResponse = response
        .json()
        .await
        .context("Failed to parse token refresh response")?;

    if data.access_token.is_empty() {
        anyhow::bail!("Token refresh response does not contain access_token");
    }

    tracing::info!("Access token refreshed");

    Ok(data)
}
