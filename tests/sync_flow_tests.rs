//! End-to-end controller flows: `update()` → `perform()` against a mock
//! server → `update()` with the resulting action.

use medchat::api::{HttpChatService, Role};
use medchat::core::action::{Action, Effect, update};
use medchat::core::state::{App, SEND_FAILED_MESSAGE, ServerStatus};
use medchat::core::sync::perform;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Feed an action through `update()` and keep running follow-up effects until
/// the state settles, like the event loop does.
async fn drive(app: &mut App, service: &HttpChatService, action: Action) {
    let mut next = Some(action);
    while let Some(action) = next.take() {
        let effect = update(app, action);
        if effect == Effect::None {
            break;
        }
        next = perform(service, effect).await;
    }
}

fn conversation_json(id: &str, title: &str, turns: usize) -> serde_json::Value {
    let messages: Vec<_> = (0..turns * 2)
        .map(|i| {
            json!({
                "role": if i % 2 == 0 { "user" } else { "assistant" },
                "content": format!("{id} message {i}"),
                "timestamp": "2024-05-01T10:00:00"
            })
        })
        .collect();
    json!({
        "id": id,
        "title": title,
        "messages": messages,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00"
    })
}

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_startup_loads_conversations_and_health() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([
            conversation_json("c2", "Newer", 1),
            conversation_json("c1", "Older", 2)
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();

    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::CheckHealth).await;

    let ids: Vec<_> = app.conversations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2", "c1"], "server order is kept");
    assert_eq!(app.server_status, ServerStatus::Online);
    assert!(app.error.is_none());
}

#[tokio::test]
async fn test_startup_failure_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();

    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::CheckHealth).await;

    assert!(app.conversations.is_empty());
    assert!(app.error.is_none(), "list failures are logged, not shown");
    assert_eq!(app.server_status, ServerStatus::Offline);
}

// ============================================================================
// Sending
// ============================================================================

#[tokio::test]
async fn test_first_message_creates_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "Is a fever of 38C dangerous?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Usually not for adults.",
            "conversation_id": "new_1",
            "disclaimer": "  Consult a professional.  "
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();

    // Optimistic half
    let effect = update(&mut app, Action::Submit("Is a fever of 38C dangerous?".to_string()));
    assert_eq!(app.messages.len(), 1);
    assert_eq!(app.messages[0].role, Role::User);
    assert!(app.is_loading);

    // Network + reconcile
    let action = perform(&service, effect).await.unwrap();
    assert_eq!(update(&mut app, action), Effect::None);

    assert!(!app.is_loading);
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[1].content, "Usually not for adults.");
    assert_eq!(app.conversations.len(), 1);
    assert_eq!(app.conversations[0].id, "new_1");
    assert_eq!(app.conversations[0].title, "Is a fever of 38C dangerous?");
    assert_eq!(app.current_id(), Some("new_1"));
    assert_eq!(app.status_message, "Consult a professional.");
}

#[tokio::test]
async fn test_follow_up_updates_existing_conversation() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([
            conversation_json("a", "First", 1),
            conversation_json("b", "Second", 1)
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "More please", "conversation_id": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Here is more.",
            "conversation_id": "b"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::SelectConversation("b".to_string())).await;
    assert_eq!(app.messages.len(), 2);

    drive(&mut app, &service, Action::Submit("More please".to_string())).await;

    assert_eq!(app.messages.len(), 4);
    let ids: Vec<_> = app.conversations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"], "list is updated in place, not reordered");
    assert_eq!(app.conversations[1].messages.len(), 4);
    assert_eq!(app.conversations[1].title, "Second");
}

#[tokio::test]
async fn test_long_first_message_title_is_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok",
            "conversation_id": "long"
        })))
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    let text = "x".repeat(80);
    drive(&mut app, &service, Action::Submit(text)).await;

    assert_eq!(app.conversations[0].title, format!("{}...", "x".repeat(50)));
}

#[tokio::test]
async fn test_failed_send_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Second time lucky.",
            "conversation_id": "r1"
        })))
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();

    drive(&mut app, &service, Action::Submit("hello".to_string())).await;
    assert!(!app.is_loading);
    assert_eq!(app.messages.len(), 1, "optimistic message is kept");
    assert!(app.is_failed(0));
    assert_eq!(app.error.as_deref(), Some(SEND_FAILED_MESSAGE));
    assert!(app.conversations.is_empty());

    drive(&mut app, &service, Action::RetryFailed).await;
    assert!(app.error.is_none());
    assert!(app.failed.is_empty());
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[0].content, "hello");
    assert_eq!(app.conversations.len(), 1);
    assert_eq!(app.conversations[0].messages.len(), 2);
}

#[tokio::test]
async fn test_blank_submit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    drive(&mut app, &service, Action::Submit("   \n ".to_string())).await;

    assert!(app.messages.is_empty());
    assert!(!app.is_loading);
}

// ============================================================================
// Deleting and refreshing
// ============================================================================

#[tokio::test]
async fn test_delete_active_conversation() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([conversation_json("a", "A", 1), conversation_json("b", "B", 1)]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/conversations/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::SelectConversation("a".to_string())).await;

    drive(&mut app, &service, Action::DeleteConversation("a".to_string())).await;

    assert_eq!(app.conversations.len(), 1);
    assert_eq!(app.conversations[0].id, "b");
    assert!(app.current_conversation.is_none());
    assert!(app.messages.is_empty());
}

#[tokio::test]
async fn test_delete_failure_changes_nothing() {
    let server = MockServer::start().await;
    mount_list(&server, json!([conversation_json("a", "A", 1)])).await;
    Mock::given(method("DELETE"))
        .and(path("/conversations/a"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::SelectConversation("a".to_string())).await;
    drive(&mut app, &service, Action::DeleteConversation("a".to_string())).await;

    assert_eq!(app.conversations.len(), 1);
    assert_eq!(app.current_id(), Some("a"));
    assert!(app.error.is_none());
}

#[tokio::test]
async fn test_refresh_pulls_server_copy() {
    let server = MockServer::start().await;
    mount_list(&server, json!([conversation_json("a", "A", 1)])).await;
    Mock::given(method("GET"))
        .and(path("/conversations/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conversation_json("a", "A", 3)))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpChatService::new(server.uri());
    let mut app = App::new();
    drive(&mut app, &service, Action::LoadConversations).await;
    drive(&mut app, &service, Action::SelectConversation("a".to_string())).await;
    assert_eq!(app.messages.len(), 2);

    drive(&mut app, &service, Action::RefreshConversation).await;

    assert_eq!(app.messages.len(), 6);
    assert_eq!(app.conversations[0].messages.len(), 6);
}
