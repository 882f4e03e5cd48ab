//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Server replies? That's `Action::ChatSucceeded(response)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state and returns the `Effect` the caller must run. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                          │
//!                        sync::perform() ◄─┘  (async, talks to the server)
//!                                │
//!                                └──► follow-up Action ──► update()
//! ```
//!
//! Sends are optimistic: the user message is appended before the request
//! leaves, then reconciled once the reply (or the failure) comes back.

use log::{debug, info, warn};

use crate::api::{ApiError, ChatRequest, ChatResponse, Conversation, HealthStatus, Message};
use crate::core::state::{App, PendingTurn, SEND_FAILED_MESSAGE, ServerStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the conversation list (dispatched once at startup).
    LoadConversations,
    ConversationsLoaded(Vec<Conversation>),
    ConversationsLoadFailed(ApiError),

    CheckHealth,
    HealthChecked(HealthStatus),
    HealthCheckFailed(ApiError),

    /// User submitted text from the input box.
    Submit(String),
    ChatSucceeded(ChatResponse),
    ChatFailed(ApiError),
    /// Resend the trailing undelivered user message.
    RetryFailed,

    /// Show a conversation from the local list (no fetch).
    SelectConversation(String),
    NewConversation,

    DeleteConversation(String),
    ConversationDeleted(String),
    DeleteFailed { id: String, error: ApiError },

    /// Re-fetch the active conversation from the server.
    RefreshConversation,
    ConversationFetched(Conversation),
    FetchFailed { id: String, error: ApiError },

    DismissError,
    Quit,
}

/// Side effect requested by `update()`. Run by `sync::perform()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    SendChat(ChatRequest),
    FetchConversations,
    FetchConversation(String),
    DeleteConversation(String),
    CheckHealth,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::LoadConversations => Effect::FetchConversations,
        Action::ConversationsLoaded(conversations) => {
            info!("Loaded {} conversations", conversations.len());
            app.conversations = conversations;
            Effect::None
        }
        Action::ConversationsLoadFailed(error) => {
            warn!("Error loading conversations: {}", error);
            Effect::None
        }

        Action::CheckHealth => Effect::CheckHealth,
        Action::HealthChecked(health) => {
            app.server_status = if health.is_healthy() {
                ServerStatus::Online
            } else {
                ServerStatus::Offline
            };
            debug!("Server health: {:?}", health);
            Effect::None
        }
        Action::HealthCheckFailed(error) => {
            warn!("Health check failed: {}", error);
            app.server_status = ServerStatus::Offline;
            Effect::None
        }

        Action::Submit(text) => submit(app, text),
        Action::ChatSucceeded(response) => reconcile_reply(app, response),
        Action::ChatFailed(error) => {
            warn!("Error sending message: {}", error);
            app.is_loading = false;
            if let Some(pending) = app.pending.take()
                && pending.view_generation == app.view_generation
            {
                app.failed.insert(pending.index);
            }
            app.error = Some(SEND_FAILED_MESSAGE.to_string());
            app.status_message.clear();
            Effect::None
        }
        Action::RetryFailed => {
            if app.is_loading {
                return Effect::None;
            }
            let Some(index) = app.retryable_index() else {
                debug!("Nothing to retry");
                return Effect::None;
            };
            app.failed.remove(&index);
            let message = app.messages.remove(index);
            info!("Retrying undelivered message (len={})", message.content.len());
            submit(app, message.content)
        }

        Action::SelectConversation(id) => {
            match app.conversations.iter().find(|c| c.id == id).cloned() {
                Some(conversation) => {
                    debug!("Selected conversation {}", id);
                    app.replace_view(Some(conversation));
                }
                None => warn!("Selected unknown conversation {}", id),
            }
            Effect::None
        }
        Action::NewConversation => {
            app.replace_view(None);
            Effect::None
        }

        Action::DeleteConversation(id) => Effect::DeleteConversation(id),
        Action::ConversationDeleted(id) => {
            app.conversations.retain(|c| c.id != id);
            if app.current_id() == Some(id.as_str()) {
                app.replace_view(None);
            }
            info!("Deleted conversation {}", id);
            Effect::None
        }
        Action::DeleteFailed { id, error } => {
            warn!("Error deleting conversation {}: {}", id, error);
            Effect::None
        }

        Action::RefreshConversation => match app.current_id() {
            Some(id) => Effect::FetchConversation(id.to_string()),
            None => Effect::None,
        },
        Action::ConversationFetched(conversation) => {
            if let Some(slot) = app.conversations.iter_mut().find(|c| c.id == conversation.id) {
                *slot = conversation.clone();
            }
            // Never clobber a transcript holding an unconfirmed message.
            if app.current_id() == Some(conversation.id.as_str()) && !app.is_loading {
                app.replace_view(Some(conversation));
            }
            Effect::None
        }
        Action::FetchFailed { id, error } => {
            warn!("Error fetching conversation {}: {}", id, error);
            Effect::None
        }

        Action::DismissError => {
            app.error = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Optimistically append the user message and request the send.
fn submit(app: &mut App, text: String) -> Effect {
    if text.trim().is_empty() {
        return Effect::None;
    }
    if app.is_loading {
        debug!("Ignoring submit while a reply is pending");
        return Effect::None;
    }

    let user_message = Message::user(text.clone());
    app.messages.push(user_message.clone());
    app.is_loading = true;
    app.error = None;
    app.status_message = String::from("Waiting for reply...");

    let conversation_id = app.current_id().map(str::to_string);
    app.pending = Some(PendingTurn {
        user_message,
        index: app.messages.len() - 1,
        conversation_id: conversation_id.clone(),
        view_generation: app.view_generation,
    });

    Effect::SendChat(ChatRequest {
        message: text,
        conversation_id,
    })
}

/// Merge a confirmed reply into the transcript and the conversation list.
fn reconcile_reply(app: &mut App, response: ChatResponse) -> Effect {
    app.is_loading = false;
    app.status_message = response.disclaimer.trim().to_string();

    let Some(pending) = app.pending.take() else {
        warn!("Received a reply with no send in flight; ignoring");
        return Effect::None;
    };

    let assistant = Message::assistant(response.response);
    // The user may have switched conversations while waiting.
    let in_view = pending.view_generation == app.view_generation;
    if in_view {
        app.messages.push(assistant.clone());
    }

    match pending.conversation_id {
        None => {
            let conversation = Conversation::from_first_turn(
                response.conversation_id,
                pending.user_message,
                assistant,
            );
            info!("Created conversation {} ({:?})", conversation.id, conversation.title);
            if in_view {
                app.current_conversation = Some(conversation.clone());
            }
            app.conversations.insert(0, conversation);
        }
        Some(id) => {
            if id != response.conversation_id {
                debug!(
                    "Server answered for {} while sending to {}",
                    response.conversation_id, id
                );
            }
            match app.conversations.iter_mut().find(|c| c.id == id) {
                Some(slot) => {
                    let updated = slot.with_turn(pending.user_message, assistant);
                    *slot = updated.clone();
                    if in_view {
                        app.current_conversation = Some(updated);
                    }
                }
                None => {
                    warn!("Conversation {} is no longer listed; reply kept in view only", id);
                    if in_view && let Some(current) = app.current_conversation.as_mut() {
                        *current = current.with_turn(pending.user_message, assistant);
                    }
                }
            }
        }
    }

    Effect::None
}
