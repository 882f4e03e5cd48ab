//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, ChatRequest, ChatResponse, ChatService, Conversation, HealthStatus, Message, Role,
};

/// A conversation with `message_count` alternating user/assistant messages
/// and fixed 2024 timestamps.
pub fn conversation(id: &str, message_count: usize) -> Conversation {
    let messages = (0..message_count)
        .map(|i| Message {
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("{id} message {i}"),
            timestamp: "2024-05-01T10:00:00".to_string(),
        })
        .collect();
    Conversation {
        id: id.to_string(),
        title: format!("Conversation {id}"),
        messages,
        created_at: "2024-05-01T10:00:00".to_string(),
        updated_at: "2024-05-01T10:00:00".to_string(),
    }
}

pub fn chat_response(text: &str, conversation_id: &str) -> ChatResponse {
    ChatResponse {
        response: text.to_string(),
        conversation_id: conversation_id.to_string(),
        disclaimer: String::new(),
    }
}

/// In-memory `ChatService` with scripted chat replies. Records every call by name.
#[derive(Default)]
pub struct StubService {
    chat_replies: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    conversations: Vec<Conversation>,
    delete_error: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubService {
    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            ..Default::default()
        }
    }

    pub fn push_chat(&self, reply: Result<ChatResponse, ApiError>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_deletes(&self, error: ApiError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl ChatService for StubService {
    async fn send_message(&self, _request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.record("send_message");
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.record("list_conversations");
        Ok(self.conversations.clone())
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        self.record("get_conversation");
        self.conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: "Conversation not found".to_string(),
            })
    }

    async fn delete_conversation(&self, _id: &str) -> Result<(), ApiError> {
        self.record("delete_conversation");
        match self.delete_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.record("health");
        Ok(HealthStatus {
            status: "healthy".to_string(),
            openai_enabled: false,
        })
    }
}
