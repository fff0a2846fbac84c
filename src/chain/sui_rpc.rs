use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::adapter::season::as_u128;
use crate::chain::ChainReader;
use crate::error::{ArenaError, Result};

/// Page size used when listing owned objects.
const OWNED_OBJECTS_PAGE: u64 = 50;

/// JSON-RPC client for a Sui full node.
pub struct SuiRpcClient {
    client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(id, method, params);

        debug!("RPC {} (id {})", method, id);

        let response = self.client.post(&self.rpc_url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(ArenaError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response.json().await?;
        into_result(json)
    }
}

pub(crate) fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Unwrap a JSON-RPC envelope into its `result`, or the error it carries.
pub(crate) fn into_result(mut envelope: Value) -> Result<Value> {
    if let Some(error) = envelope.get("error") {
        return Err(ArenaError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(-1),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match envelope.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ArenaError::MalformedObject(
            "RPC response has neither result nor error".to_string(),
        )),
    }
}

#[async_trait]
impl ChainReader for SuiRpcClient {
    async fn get_object(&self, object_id: &str) -> Result<Value> {
        let mut result = self
            .call(
                "sui_getObject",
                json!([object_id, { "showContent": true, "showType": true }]),
            )
            .await?;

        if let Some(error) = result.get("error") {
            warn!("Object {} unavailable: {}", object_id, error);
            return Err(ArenaError::ObjectNotFound(object_id.to_string()));
        }

        match result.get_mut("data") {
            Some(data) if data.get("content").is_some() => Ok(data.take()),
            _ => Err(ArenaError::ObjectNotFound(object_id.to_string())),
        }
    }

    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<u128> {
        let result = self.call("suix_getBalance", json!([owner, coin_type])).await?;

        result
            .get("totalBalance")
            .and_then(as_u128)
            .ok_or_else(|| ArenaError::MalformedObject(format!("balance of {} for {}", coin_type, owner)))
    }

    async fn get_owned_objects(&self, owner: &str, struct_type: &str) -> Result<Vec<Value>> {
        let mut objects = Vec::new();
        let mut cursor = Value::Null;

        loop {
            let page = self
                .call(
                    "suix_getOwnedObjects",
                    json!([
                        owner,
                        {
                            "filter": { "StructType": struct_type },
                            "options": { "showContent": true, "showType": true }
                        },
                        cursor,
                        OWNED_OBJECTS_PAGE
                    ]),
                )
                .await?;

            if let Some(items) = page.get("data").and_then(Value::as_array) {
                objects.extend(items.iter().filter_map(|item| item.get("data").cloned()));
            }

            let has_next = page.get("hasNextPage").and_then(Value::as_bool).unwrap_or(false);
            match page.get("nextCursor") {
                Some(next) if has_next && !next.is_null() => cursor = next.clone(),
                _ => break,
            }
        }

        debug!("{} owns {} objects of {}", owner, objects.len(), struct_type);
        Ok(objects)
    }
}
