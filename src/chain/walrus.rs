use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::chain::BlobReader;
use crate::error::{ArenaError, Result};

/// Read-only client for a Walrus aggregator.
pub struct WalrusClient {
    client: Client,
    aggregator_url: String,
    network: String,
}

impl WalrusClient {
    pub fn new(
        aggregator_url: impl Into<String>,
        network: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            aggregator_url: aggregator_url.into().trim_end_matches('/').to_string(),
            network: network.into(),
        })
    }
}

/// Blob ids are URL-safe base64 strings; anything shorter than 11 characters
/// cannot be one.
pub fn is_valid_blob_id(blob_id: &str) -> bool {
    blob_id.len() > 10
        && blob_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

pub fn walruscan_url(network: &str, blob_id: &str) -> String {
    format!("https://walruscan.com/{}/blob/{}", network, blob_id)
}

#[async_trait]
impl BlobReader for WalrusClient {
    async fn read_json(&self, blob_id: &str) -> Result<Value> {
        if !is_valid_blob_id(blob_id) {
            return Err(ArenaError::InvalidBlobId(blob_id.to_string()));
        }

        let url = format!("{}/v1/blobs/{}", self.aggregator_url, blob_id);
        debug!("Reading blob {} from {}", blob_id, self.aggregator_url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ArenaError::BlobNotFound(blob_id.to_string())),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                error!("Blob {} read failed with HTTP {}", blob_id, status);
                return Err(ArenaError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn explorer_url(&self, blob_id: &str) -> String {
        walruscan_url(&self.network, blob_id)
    }
}
