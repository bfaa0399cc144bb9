//! Chat store flows against a live server
//!
//! Run with: cargo test -p integration-tests --test chat_tests

use chat_client::{ChatApp, Notification};
use chat_core::{SendMessageRequest, User};
use integration_tests::{signup_request, wait_until, TestServer, SETTLE};
use tokio::sync::mpsc::UnboundedReceiver;

/// Signed-up client app with its socket open
async fn signed_up(server: &TestServer, name: &str) -> (ChatApp, User, UnboundedReceiver<Notification>) {
    let (app, notes) = server.client_app().unwrap();
    assert!(app.session().signup(signup_request(name)).await);
    let user = app.session().auth_user().unwrap();
    assert!(app.session().is_socket_connected());
    (app, user, notes)
}

/// Send `text` from `app` to `to` through the chat store
async fn send(app: &ChatApp, to: &User, text: &str) {
    app.chat().set_selected_user(Some(to.clone()));
    assert!(app.chat().send_message(SendMessageRequest::text(text)).await);
}

fn texts(app: &ChatApp) -> Vec<String> {
    app.chat()
        .messages()
        .into_iter()
        .filter_map(|m| m.text)
        .collect()
}

#[tokio::test]
async fn test_get_users_excludes_self() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (_bob_app, bob, _) = signed_up(&server, "Bob").await;

    assert!(alice_app.chat().get_users().await);
    let ids: Vec<_> = alice_app.chat().users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![bob.id]);
    assert!(!ids.contains(&alice.id));
    assert!(!alice_app.chat().snapshot().is_users_loading);
}

#[tokio::test]
async fn test_selection_keeps_exactly_one_listener() {
    let server = TestServer::start().await.unwrap();
    let (app, _, _) = signed_up(&server, "Alice").await;
    let (_bob_app, bob, _) = signed_up(&server, "Bob").await;
    let (_carol_app, carol, _) = signed_up(&server, "Carol").await;

    let chat = app.chat();
    chat.set_selected_user(Some(bob.clone()));
    assert_eq!(chat.message_listener_count(), 1);

    chat.set_selected_user(Some(bob));
    chat.subscribe_to_messages();
    assert_eq!(chat.message_listener_count(), 1);

    chat.set_selected_user(Some(carol));
    assert_eq!(chat.message_listener_count(), 1);

    chat.set_selected_user(None);
    assert_eq!(chat.message_listener_count(), 0);
}

#[tokio::test]
async fn test_history_then_live_push() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;

    send(&alice_app, &bob, "m1").await;
    send(&bob_app, &alice, "m2").await;

    alice_app.chat().set_selected_user(None);
    assert!(alice_app.chat().open_conversation(bob.clone()).await);
    assert_eq!(texts(&alice_app), vec!["m1", "m2"]);

    send(&bob_app, &alice, "m3").await;
    assert!(wait_until(SETTLE, || texts(&alice_app).len() == 3).await);
    assert_eq!(texts(&alice_app), vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn test_push_from_unselected_sender_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;
    let (carol_app, _carol, _) = signed_up(&server, "Carol").await;

    alice_app.chat().set_selected_user(Some(bob));

    send(&carol_app, &alice, "from carol").await;
    send(&bob_app, &alice, "from bob").await;

    // Pushes arrive in order, so once Bob's is in Carol's has been seen
    assert!(wait_until(SETTLE, || !texts(&alice_app).is_empty()).await);
    assert_eq!(texts(&alice_app), vec!["from bob"]);
}

#[tokio::test]
async fn test_switching_conversation_drops_old_sender() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;
    let (carol_app, carol, _) = signed_up(&server, "Carol").await;

    alice_app.chat().set_selected_user(Some(bob));
    alice_app.chat().set_selected_user(Some(carol.clone()));

    send(&bob_app, &alice, "from bob").await;
    send(&carol_app, &alice, "from carol").await;

    assert!(wait_until(SETTLE, || !texts(&alice_app).is_empty()).await);
    assert_eq!(texts(&alice_app), vec!["from carol"]);
    assert!(alice_app
        .chat()
        .messages()
        .iter()
        .all(|m| m.sender_id == carol.id));
}

#[tokio::test]
async fn test_reconnect_keeps_message_listener() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;

    alice_app.chat().set_selected_user(Some(bob));
    assert_eq!(alice_app.chat().message_listener_count(), 1);

    assert!(alice_app.session().disconnect_socket());
    assert!(alice_app.session().check_auth().await);
    assert!(alice_app.session().is_socket_connected());
    assert_eq!(alice_app.chat().message_listener_count(), 1);

    // Wait until the server counts the new connection before pushing to it
    assert!(wait_until(SETTLE, || bob_app.session().is_online(alice.id)).await);
    send(&bob_app, &alice, "after reconnect").await;
    assert!(wait_until(SETTLE, || !texts(&alice_app).is_empty()).await);
    assert_eq!(texts(&alice_app), vec!["after reconnect"]);
}

#[tokio::test]
async fn test_overlapping_history_loads_keep_latest_selection() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;
    let (carol_app, carol, _) = signed_up(&server, "Carol").await;

    send(&bob_app, &alice, "bob 1").await;
    send(&bob_app, &alice, "bob 2").await;
    send(&carol_app, &alice, "carol 1").await;

    // Bob's request starts first; Carol is selected before either completes
    let chat = alice_app.chat();
    let (bob_loaded, carol_loaded) = tokio::join!(chat.open_conversation(bob), async {
        tokio::task::yield_now().await;
        chat.open_conversation(carol.clone()).await
    });

    assert!(!bob_loaded);
    assert!(carol_loaded);
    assert_eq!(chat.selected_user().map(|u| u.id), Some(carol.id));
    assert_eq!(texts(&alice_app), vec!["carol 1"]);
    assert!(!chat.snapshot().is_messages_loading);
}

#[tokio::test]
async fn test_send_message_appends_server_copy_once() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, alice, _) = signed_up(&server, "Alice").await;
    let (bob_app, bob, _) = signed_up(&server, "Bob").await;
    bob_app.chat().set_selected_user(Some(alice.clone()));

    alice_app.chat().set_selected_user(Some(bob.clone()));
    assert!(alice_app
        .chat()
        .send_message(SendMessageRequest::text("  hello  "))
        .await);

    let messages = alice_app.chat().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text.as_deref(), Some("hello"));
    assert_eq!(messages[0].sender_id, alice.id);
    assert_eq!(messages[0].receiver_id, bob.id);

    // The receiver gets the same message over the socket
    assert!(wait_until(SETTLE, || bob_app.chat().messages().len() == 1).await);
    assert_eq!(bob_app.chat().messages(), messages);
    assert_eq!(alice_app.chat().messages().len(), 1);
}

#[tokio::test]
async fn test_send_message_failure_notifies() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, _alice, mut notes) = signed_up(&server, "Alice").await;
    let (_bob_app, bob, _) = signed_up(&server, "Bob").await;
    while notes.try_recv().is_ok() {}

    alice_app.chat().set_selected_user(Some(bob));
    assert!(!alice_app
        .chat()
        .send_message(SendMessageRequest::default())
        .await);

    assert!(notes.recv().await.unwrap().is_error());
    assert!(alice_app.chat().messages().is_empty());
}

#[tokio::test]
async fn test_logout_resets_conversation() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, _alice, _) = signed_up(&server, "Alice").await;
    let (_bob_app, bob, _) = signed_up(&server, "Bob").await;

    assert!(alice_app.chat().get_users().await);
    alice_app.chat().set_selected_user(Some(bob));

    alice_app.logout().await;

    let chat = alice_app.chat().snapshot();
    assert!(chat.selected_user.is_none());
    assert!(chat.users.is_empty());
    assert!(chat.messages.is_empty());
}
