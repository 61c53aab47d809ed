use std::time::Duration;

use async_trait::async_trait;
use nlq_core::api::{ApiError, GraphQueryApi};
use nlq_core::model::{HealthStatus, QueryRequest, QueryResult, SchemaInfo};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const QUERY_PATH: &str = "/api/query";
const SCHEMA_PATH: &str = "/api/schema";
const HEALTH_PATH: &str = "/";

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

/// `GraphQueryApi` over the backend's JSON HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpGraphQueryApi {
    client: Client,
    base_url: String,
}

impl HttpGraphQueryApi {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, HttpClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(HttpClientError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl GraphQueryApi for HttpGraphQueryApi {
    async fn submit_query(&self, query: &str) -> Result<QueryResult, ApiError> {
        let url = self.endpoint(QUERY_PATH);
        debug!(%url, "posting query");
        let response = self
            .client
            .post(&url)
            .json(&QueryRequest::new(query))
            .send()
            .await
            .map_err(to_transport_error)?;

        read_json(response).await
    }

    async fn fetch_schema(&self) -> Result<SchemaInfo, ApiError> {
        let url = self.endpoint(SCHEMA_PATH);
        debug!(%url, "fetching schema");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(to_transport_error)?;
        read_json(response).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(to_transport_error)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(to_transport_error)?;
    debug!(status = status.as_u16(), bytes = body.len(), "backend responded");

    if !status.is_success() {
        let server_message = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|value| error_field(&value));
        return Err(ApiError::Status {
            status: status.as_u16(),
            server_message,
        });
    }

    serde_json::from_slice(&body).map_err(|error| ApiError::decode(error.to_string()))
}

fn error_field(body: &Value) -> Option<String> {
    body.get("error")?.as_str().map(str::to_string)
}

fn to_transport_error(error: reqwest::Error) -> ApiError {
    ApiError::transport(error.to_string())
}
