use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use super::domain::CanonicalProperty;
use crate::config::StoreConfig;

/// Insert-many seam over the hosted listings table.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert_many(&self, records: &[CanonicalProperty]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store rejected batch with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("store transport failed: {0}")]
    Transport(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Table store reached through its REST endpoint
/// (`POST {base}/rest/v1/{table}` with a JSON array body).
pub struct RestPropertyStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RestPropertyStore {
    /// Fails when the api key cannot be sent as a header value.
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(auth_headers(api_key)?)
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
        })
    }

    /// `None` when no store URL is configured.
    pub fn from_config(config: &StoreConfig) -> Result<Option<Self>, StoreError> {
        match config.url.as_deref() {
            Some(url) => Self::new(url, &config.api_key, &config.table).map(Some),
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, StoreError> {
    let invalid = |err: reqwest::header::InvalidHeaderValue| {
        StoreError::Unavailable(format!("invalid store api key: {err}"))
    };

    let mut api_key_value = HeaderValue::from_str(api_key).map_err(invalid)?;
    api_key_value.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(invalid)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", api_key_value);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("prefer", HeaderValue::from_static("return=minimal"));
    Ok(headers)
}

impl std::fmt::Debug for RestPropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPropertyStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PropertyStore for RestPropertyStore {
    async fn insert_many(&self, records: &[CanonicalProperty]) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(records)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
