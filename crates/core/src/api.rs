use async_trait::async_trait;
use thiserror::Error;

use crate::model::{HealthStatus, QueryResult, SchemaInfo};

pub const DEFAULT_QUERY_ERROR_MESSAGE: &str = "An error occurred while processing your query";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend responded with HTTP {status}")]
    Status {
        status: u16,
        server_message: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Error text supplied by the backend itself, if any. Empty strings count as absent.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { server_message, .. } => {
                server_message.as_deref().filter(|message| !message.is_empty())
            }
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        self.server_message()
            .unwrap_or(DEFAULT_QUERY_ERROR_MESSAGE)
            .to_string()
    }
}

/// Backend operations the client depends on.
#[async_trait]
pub trait GraphQueryApi: Send + Sync {
    async fn submit_query(&self, query: &str) -> Result<QueryResult, ApiError>;

    async fn fetch_schema(&self) -> Result<SchemaInfo, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
