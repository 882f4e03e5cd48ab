//! # Chat Back-End API
//!
//! Typed access to the remote chat service (`/chat`, `/conversations`, `/health`).
//!
//! - [`types`]: wire types (`Message`, `Conversation`, request/response bodies)
//! - [`service`]: the `ChatService` trait and the uniform `ApiError`
//! - [`client`]: `HttpChatService`, the reqwest implementation

pub mod client;
pub mod service;
pub mod types;

pub use client::{DEFAULT_BASE_URL, HttpChatService};
pub use service::{ApiError, ChatService, Operation};
pub use types::{ChatRequest, ChatResponse, Conversation, HealthStatus, Message, Role};
