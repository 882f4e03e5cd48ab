//! # Effect Runner
//!
//! The async half of the controller. `update()` decides *what* to ask the
//! server; `perform()` asks it and turns the outcome into the follow-up
//! `Action`. Each effect makes exactly one call and is never retried.

use log::debug;

use crate::api::ChatService;
use crate::core::action::{Action, Effect};

/// Run one effect against the service. Returns `None` for effects that need no
/// server round trip (`None`, `Quit`).
pub async fn perform(service: &dyn ChatService, effect: Effect) -> Option<Action> {
    debug!("Performing effect: {:?}", effect);
    let action = match effect {
        Effect::None | Effect::Quit => return None,
        Effect::SendChat(request) => match service.send_message(&request).await {
            Ok(response) => Action::ChatSucceeded(response),
            Err(error) => Action::ChatFailed(error),
        },
        Effect::FetchConversations => match service.list_conversations().await {
            Ok(conversations) => Action::ConversationsLoaded(conversations),
            Err(error) => Action::ConversationsLoadFailed(error),
        },
        Effect::FetchConversation(id) => match service.get_conversation(&id).await {
            Ok(conversation) => Action::ConversationFetched(conversation),
            Err(error) => Action::FetchFailed { id, error },
        },
        Effect::DeleteConversation(id) => match service.delete_conversation(&id).await {
            Ok(()) => Action::ConversationDeleted(id),
            Err(error) => Action::DeleteFailed { id, error },
        },
        Effect::CheckHealth => match service.health().await {
            Ok(health) => Action::HealthChecked(health),
            Err(error) => Action::HealthCheckFailed(error),
        },
    };
    Some(action)
}
