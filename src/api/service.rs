use std::fmt;

use async_trait::async_trait;

use super::types::{ChatRequest, ChatResponse, Conversation, HealthStatus};

/// The remote calls the client knows how to make. Used to pick the fallback
/// message when the server does not explain a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendMessage,
    ListConversations,
    GetConversation,
    DeleteConversation,
    Health,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::SendMessage => "Failed to send message",
            Operation::ListConversations => "Failed to fetch conversations",
            Operation::GetConversation => "Failed to fetch conversation",
            Operation::DeleteConversation => "Failed to delete conversation",
            Operation::Health => "Failed to check server health",
        }
    }
}

/// Uniform error for every remote call.
///
/// `Display` yields the user-facing message: the server's `detail` when it
/// sent one, otherwise the operation's fallback, or "Network error" when no
/// response arrived at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response received (connection refused, DNS, reset).
    Network(String),
    /// Non-2xx response. `message` is the detail or the fallback.
    Rejected { status: u16, message: String },
    /// 2xx response whose body could not be decoded.
    Decode { operation: Operation, reason: String },
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(_) => "Network error",
            ApiError::Rejected { message, .. } => message,
            ApiError::Decode { operation, .. } => operation.fallback_message(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// `POST /chat`
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// `GET /conversations`
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    /// `GET /conversations/{id}`
    async fn get_conversation(&self, id: &str) -> Result<Conversation, ApiError>;

    /// `DELETE /conversations/{id}`
    async fn delete_conversation(&self, id: &str) -> Result<(), ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
