//! Authenticated HTTP client for the IDM admin API.
//!
//! Wraps a pooled [`reqwest`] transport with bearer-token authorization,
//! transparent refresh-on-401 (at most once per logical request), and a
//! per-request correlation id threaded through request/response logging.
//!
//! ```no_run
//! use std::sync::Arc;
//! use idm_client::{ApiClient, ClientConfig};
//! use idm_client::auth::MemoryTokenStore;
//!
//! # async fn example() -> idm_client::Result<()> {
//! let config = ClientConfig::new("https://api.example.com")?;
//! let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new()))?;
//!
//! client.set_auth_token("tok123")?;
//! let user: serde_json::Value = client.get("/users/1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod auth;
pub mod request;
pub mod http_client;

pub use config::{ClientConfig, HttpSettings};
pub use error::{ClientError, Result};
pub use http_client::ApiClient;
pub use request::RequestDescriptor;
