//! # Application State
//!
//! Core business state for the chat client. Domain logic only, no TUI types.
//! Presentation state (scroll offsets, focus, draft text) lives in `tui`.
//!
//! ```text
//! App
//! ├── conversations: Vec<Conversation>         // sidebar list, newest first
//! ├── current_conversation: Option<...>        // active conversation snapshot
//! ├── messages: Vec<Message>                   // working transcript on screen
//! ├── is_loading: bool                         // a send is in flight
//! ├── error: Option<String>                    // banner text
//! ├── status_message: String                   // title bar text
//! ├── server_status: ServerStatus              // last /health result
//! ├── pending: Option<PendingTurn>             // the in-flight send
//! ├── failed: BTreeSet<usize>                  // transcript indices never delivered
//! └── view_generation: u64                     // bumped whenever the view changes
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::BTreeSet;

use crate::api::{Conversation, Message};

/// Banner text shown when a send fails. The server's own reason is only logged.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn label(self) -> &'static str {
        match self {
            ServerStatus::Unknown => "connecting",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        }
    }
}

/// What was optimistically applied for the send currently in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    /// The user message already appended to the transcript.
    pub user_message: Message,
    /// Its index in `App::messages`.
    pub index: usize,
    /// Conversation the message was sent to (`None` starts a new one).
    pub conversation_id: Option<String>,
    /// `App::view_generation` at send time.
    pub view_generation: u64,
}

#[derive(Debug, Default)]
pub struct App {
    pub conversations: Vec<Conversation>,
    pub current_conversation: Option<Conversation>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub status_message: String,
    pub server_status: ServerStatus,
    pub pending: Option<PendingTurn>,
    pub failed: BTreeSet<usize>,
    pub view_generation: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            status_message: String::from("Welcome to MedChat!"),
            ..Default::default()
        }
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_conversation.as_ref().map(|c| c.id.as_str())
    }

    pub fn is_failed(&self, index: usize) -> bool {
        self.failed.contains(&index)
    }

    /// Index of the last transcript message if it is an undelivered user message.
    pub fn retryable_index(&self) -> Option<usize> {
        let last = self.messages.len().checked_sub(1)?;
        self.failed.contains(&last).then_some(last)
    }

    /// Swap the visible transcript. Anything in flight keeps its old generation.
    pub(crate) fn replace_view(&mut self, conversation: Option<Conversation>) {
        self.messages = conversation
            .as_ref()
            .map(|c| c.messages.clone())
            .unwrap_or_default();
        self.current_conversation = conversation;
        self.failed.clear();
        self.view_generation += 1;
    }
}
