// Authenticated HTTP client
// Bearer-token requests with transparent refresh-on-401 and a fresh
// correlation id on every dispatch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::auth::{self, LogRedirect, SessionListener, TokenStore};
use crate::config::{ClientConfig, HttpSettings};
use crate::error::{ClientError, Result};
use crate::request::{Attempt, RequestDescriptor};

/// HTTP client for the IDM admin API.
///
/// Tokens are read back from the injected store on every request, so a
/// token set by one client instance is visible to all others sharing the
/// store. Concurrent requests that each hit a 401 will each run their own
/// refresh; the last one to persist wins. The refresh endpoint tolerates
/// this, so the race is accepted rather than deduplicated.
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Instance configuration
    config: ClientConfig,

    /// Durable token storage
    store: Arc<dyn TokenStore>,

    /// Notified when authentication cannot be recovered
    listener: Arc<dyn SessionListener>,
}

impl ApiClient {
    /// Create a new client over the given configuration and token store.
    ///
    /// Transport settings (timeouts, pool size) come from the process-wide
    /// [`HttpSettings`]. Cookies are never sent; authorization is
    /// bearer-token only.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let settings = HttpSettings::global();

        let client = Client::builder()
            .pool_max_idle_per_host(settings.max_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            store,
            listener: Arc::new(LogRedirect),
        })
    }

    /// Replace the session listener (navigation on forced logout).
    pub fn with_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // === Token lifecycle ===

    /// Persist the access token; subsequent requests use it until it is
    /// replaced or cleared.
    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.store.set(&self.config.access_token_key, token)?;
        Ok(())
    }

    /// Persist the refresh token used by the transparent refresh flow.
    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.store.set(&self.config.refresh_token_key, token)?;
        Ok(())
    }

    /// Remove both stored tokens; subsequent requests go out
    /// unauthenticated until a new token is set.
    pub fn clear_auth_token(&self) -> Result<()> {
        self.store.remove(&self.config.access_token_key)?;
        self.store.remove(&self.config.refresh_token_key)?;
        Ok(())
    }

    // === Verbs ===

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(RequestDescriptor::new(Method::GET, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor =
            RequestDescriptor::new(Method::POST, path).with_body(serde_json::to_value(body)?);
        self.execute(descriptor).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor =
            RequestDescriptor::new(Method::PUT, path).with_body(serde_json::to_value(body)?);
        self.execute(descriptor).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor =
            RequestDescriptor::new(Method::PATCH, path).with_body(serde_json::to_value(body)?);
        self.execute(descriptor).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(RequestDescriptor::new(Method::DELETE, path))
            .await
    }

    /// Run a caller-built descriptor through the full pipeline.
    pub async fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let response = self.send(&descriptor).await?;
        Self::decode(response).await
    }

    // === Pipeline ===

    /// Dispatch a descriptor, refreshing the access token and re-issuing
    /// the request at most once on a 401.
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let mut attempt = Attempt::first();

        loop {
            let response = self.dispatch(descriptor).await?;

            if response.status() == StatusCode::UNAUTHORIZED && !attempt.is_retried() {
                attempt = attempt.retried();
                tracing::warn!(
                    method = %descriptor.method(),
                    path = descriptor.path(),
                    "Received 401, attempting token refresh"
                );
                self.refresh_tokens().await?;
                continue;
            }

            return Ok(response);
        }
    }

    /// One outbound dispatch: stamp headers, send, log.
    async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.endpoint(descriptor.path())?;

        tracing::debug!(
            method = %descriptor.method(),
            url = %url,
            correlation_id = %correlation_id,
            "Sending HTTP request"
        );

        let mut request = self
            .client
            .request(descriptor.method().clone(), url)
            .header("Content-Type", "application/json")
            .header("X-Correlation-ID", &correlation_id);

        // Token is read fresh from the store on every dispatch
        if let Some(token) = self.store.get(&self.config.access_token_key)? {
            request = request.header("Authorization", format!("Bearer {}", token));

            if let Some(user_id) = auth::user_id_from_token(&token) {
                request = request.header("user-id", user_id);
            }
        }

        for (name, value) in descriptor.headers() {
            request = request.header(name, value);
        }

        if let Some(body) = descriptor.body() {
            request = request.json(body);
        }

        let response = request.send().await?;

        tracing::debug!(
            status = %response.status(),
            correlation_id = %correlation_id,
            "Received HTTP response"
        );

        Ok(response)
    }

    /// Run the refresh flow. Missing refresh token or a failed refresh
    /// call both escalate to forced logout.
    async fn refresh_tokens(&self) -> Result<()> {
        let refresh_token = self.store.get(&self.config.refresh_token_key)?;

        let Some(refresh_token) = refresh_token else {
            tracing::warn!("No refresh token stored, forcing logout");
            return Err(self.force_logout());
        };

        match auth::refresh_access_token(&self.client, &self.config, &refresh_token).await {
            Ok(data) => {
                self.store
                    .set(&self.config.access_token_key, &data.access_token)?;
                if let Some(new_refresh_token) = data.refresh_token {
                    self.store
                        .set(&self.config.refresh_token_key, &new_refresh_token)?;
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("Token refresh failed: {}", e);
                Err(self.force_logout())
            }
        }
    }

    /// Clear both tokens and notify the session listener.
    fn force_logout(&self) -> ClientError {
        if let Err(e) = self.clear_auth_token() {
            tracing::error!("Failed to clear stored tokens: {}", e);
        }

        self.listener.on_session_expired(&self.config.login_path);

        ClientError::SessionExpired(
            "authentication expired and could not be refreshed".to_string(),
        )
    }

    /// Join a request path onto the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(ClientError::from)
    }

    /// Extract the typed body from a response, or a typed error from a
    /// failed one.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(ClientError::from);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            message = %message,
            "API request failed"
        );

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
