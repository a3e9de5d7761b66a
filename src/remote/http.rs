use std::env;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::AppError;

use super::{ChangeEvent, RemoteStore};

#[derive(Clone, Debug)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteStoreConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("REMOTE_STORE_URL")
            .map_err(|_| AppError::BadRequest("REMOTE_STORE_URL is not set".to_string()))?;
        let api_key = env::var("REMOTE_STORE_KEY")
            .map_err(|_| AppError::BadRequest("REMOTE_STORE_KEY is not set".to_string()))?;

        Ok(Self { base_url, api_key })
    }
}

/// REST client for the hosted record store (PostgREST-style endpoints plus an
/// SSE change feed).
pub struct HttpRemoteStore {
    client: Client,
    config: RemoteStoreConfig,
}

impl HttpRemoteStore {
    pub fn new(config: RemoteStoreConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base(), table)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }

    /// Classify a non-success response. Undefined-table errors (Postgres
    /// `42P01`, PostgREST `PGRST205`, or a plain 404) mean the expected
    /// schema was never created and the engine should fall back to the local
    /// mirror.
    async fn read_error(table: &str, response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::NOT_FOUND
            || body.contains("does not exist")
            || body.contains("42P01")
            || body.contains("PGRST205")
        {
            AppError::SchemaMissing(format!("relation \"{}\" is unavailable: {}", table, body))
        } else {
            AppError::Remote(format!("{} on {}: {}", status, table, body))
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn select_all(
        &self,
        table: &str,
        order_desc: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        let mut request = self.client.get(self.rest_url(table)).query(&[("select", "*")]);
        if let Some(column) = order_desc {
            request = request.query(&[("order", format!("{}.desc", column))]);
        }

        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("select from {} failed: {}", table, e)))?;

        if !response.status().is_success() {
            return Err(Self::read_error(table, response).await);
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| AppError::Remote(format!("invalid rows from {}: {}", table, e)))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        let response = self
            .authed(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=minimal")
            .json(&vec![row])
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("insert into {} failed: {}", table, e)))?;

        if !response.status().is_success() {
            return Err(Self::read_error(table, response).await);
        }

        Ok(())
    }

    async fn update_by_id(
        &self,
        table: &str,
        id: &str,
        patch: Value,
    ) -> Result<Vec<Value>, AppError> {
        let response = self
            .authed(self.client.patch(self.rest_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("update on {} failed: {}", table, e)))?;

        if !response.status().is_success() {
            return Err(Self::read_error(table, response).await);
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| AppError::Remote(format!("invalid rows from {}: {}", table, e)))
    }

    async fn delete_by_id(&self, table: &str, id: &str) -> Result<(), AppError> {
        let response = self
            .authed(self.client.delete(self.rest_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("delete from {} failed: {}", table, e)))?;

        if !response.status().is_success() {
            return Err(Self::read_error(table, response).await);
        }

        Ok(())
    }

    async fn subscribe_changes(&self) -> Result<mpsc::Receiver<ChangeEvent>, AppError> {
        let url = format!("{}/realtime/v1/changes", self.base());
        let response = self
            .authed(self.client.get(&url).header("Accept", "text/event-stream"))
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("change feed connect failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::read_error("change feed", response).await);
        }

        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!("change feed stream error: {}", e);
                        break;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim().to_string();
                    buffer.drain(..=pos);

                    let Some(data) = line.strip_prefix("data:") else {
                        continue;
                    };
                    match serde_json::from_str::<Value>(data.trim()) {
                        Ok(event) => {
                            let table = event
                                .get("table")
                                .and_then(Value::as_str)
                                .unwrap_or("unknown")
                                .to_string();
                            let kind = event
                                .get("type")
                                .and_then(Value::as_str)
                                .unwrap_or("*")
                                .to_string();
                            if tx.send(ChangeEvent { table, event: kind }).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("ignoring malformed change event: {}", e),
                    }
                }
            }
            // Sender drops here; the receiver closes and the listener
            // re-subscribes.
        });

        Ok(rx)
    }
}
