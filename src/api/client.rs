//! reqwest implementation of [`ChatService`].
//!
//! One method per endpoint, one HTTP call per method. Every failure is
//! collapsed into an [`ApiError`] here so callers never see reqwest types.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Response;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::service::{ApiError, ChatService, Operation};
use super::types::{ChatRequest, ChatResponse, Conversation, ErrorBody, HealthStatus};

/// Address of the chat back end when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub struct HttpChatService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Builder only fails on TLS backend init; fall back to a plain client.
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with default headers: {}", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn conversation_url(&self, id: &str) -> String {
        self.url(&format!("/conversations/{id}"))
    }
}

impl Default for HttpChatService {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Map a transport failure (no response at all).
fn network_error(operation: Operation, err: reqwest::Error) -> ApiError {
    warn!("{:?}: no response from server: {}", operation, err);
    ApiError::Network(err.to_string())
}

/// Turn a non-2xx response into `ApiError::Rejected`, preferring the server's `detail`.
async fn rejection(operation: Operation, response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_detail(&body).unwrap_or_else(|| operation.fallback_message().to_string());
    warn!("{:?} rejected: HTTP {} - {}", operation, status.as_u16(), body);
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// The `detail` string of an error body, if there is a non-empty one.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty())
}

/// Check status, then decode the JSON body.
async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, ApiError> {
    let status = response.status();
    debug!("{:?} response status: {}", operation, status);
    if !status.is_success() {
        return Err(rejection(operation, response).await);
    }
    response.json::<T>().await.map_err(|e| {
        warn!("{:?}: could not decode response body: {}", operation, e);
        ApiError::Decode {
            operation,
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let operation = Operation::SendMessage;
        info!(
            "POST /chat (conversation_id={:?}, message_len={})",
            request.conversation_id,
            request.message.len()
        );
        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        decode(operation, response).await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let operation = Operation::ListConversations;
        info!("GET /conversations");
        let response = self
            .client
            .get(self.url("/conversations"))
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        let conversations: Vec<Conversation> = decode(operation, response).await?;
        debug!("Fetched {} conversations", conversations.len());
        Ok(conversations)
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        let operation = Operation::GetConversation;
        info!("GET /conversations/{}", id);
        let response = self
            .client
            .get(self.conversation_url(id))
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        decode(operation, response).await
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), ApiError> {
        let operation = Operation::DeleteConversation;
        info!("DELETE /conversations/{}", id);
        let response = self
            .client
            .delete(self.conversation_url(id))
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(rejection(operation, response).await)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let operation = Operation::Health;
        debug!("GET /health");
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        decode(operation, response).await
    }
}
