//! Session store flows against a live server
//!
//! Run with: cargo test -p integration-tests --test session_tests

use chat_client::Notification;
use chat_core::{LoginRequest, UpdateProfileRequest};
use integration_tests::{login_for, signup_request, wait_until, TestServer, SETTLE};

#[tokio::test]
async fn test_login_scenario() {
    let server = TestServer::start().await.unwrap();
    let (app, mut notes) = server.client_app().unwrap();
    let session = app.session();
    let request = signup_request("Alice");

    // Register from a separate client so this one starts unauthenticated
    let (other, _) = server.client_app().unwrap();
    assert!(other.session().signup(request.clone()).await);
    other.logout().await;

    assert!(session.is_checking_auth());
    assert!(!session.check_auth().await);
    assert!(!session.is_checking_auth());
    assert!(session.auth_user().is_none());
    assert!(notes.try_recv().is_err());

    assert!(session.login(login_for(&request)).await);
    let user = session.auth_user().unwrap();
    assert_eq!(user.email, request.email);
    assert!(session.is_socket_connected());
    assert_eq!(
        notes.recv().await.unwrap(),
        Notification::Success("Logged in successfully".into())
    );

    assert!(wait_until(SETTLE, || session.is_online(user.id)).await);
    assert!(!session.snapshot().is_logging_in);
}

#[tokio::test]
async fn test_check_auth_restores_session_from_cookie() {
    let server = TestServer::start().await.unwrap();
    let (app, _notes) = server.client_app().unwrap();

    assert!(app.session().signup(signup_request("Bob")).await);
    app.session().disconnect_socket();
    assert!(!app.session().is_socket_connected());

    assert!(app.session().check_auth().await);
    assert!(app.session().auth_user().is_some());
    assert!(app.session().is_socket_connected());
}

#[tokio::test]
async fn test_signup_failure_notifies_server_message() {
    let server = TestServer::start().await.unwrap();
    let (app, mut notes) = server.client_app().unwrap();
    let request = signup_request("Carol");

    assert!(app.session().signup(request.clone()).await);
    app.logout().await;
    while notes.try_recv().is_ok() {}

    assert!(!app.session().signup(request).await);
    assert_eq!(
        notes.recv().await.unwrap(),
        Notification::Error("Email already exists".into())
    );
    assert!(!app.session().snapshot().is_signing_up);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = TestServer::start().await.unwrap();
    let (app, mut notes) = server.client_app().unwrap();

    assert!(!app.session().login(LoginRequest::new("nobody@example.com", "whatever")).await);
    assert_eq!(
        notes.recv().await.unwrap(),
        Notification::Error("Invalid credentials".into())
    );
    assert!(!app.session().is_socket_connected());
}

#[tokio::test]
async fn test_connect_socket_twice_keeps_one_connection() {
    let server = TestServer::start().await.unwrap();
    let (app, _notes) = server.client_app().unwrap();
    let session = app.session();

    assert!(session.signup(signup_request("Dave")).await);
    assert!(session.is_socket_connected());

    let (first, second) = tokio::join!(session.connect_socket(), session.connect_socket());
    assert!(!first && !second);
    assert!(session.is_socket_connected());
}

#[tokio::test]
async fn test_presence_follows_other_users() {
    let server = TestServer::start().await.unwrap();
    let (alice_app, _a) = server.client_app().unwrap();
    let (bob_app, _b) = server.client_app().unwrap();

    assert!(alice_app.session().signup(signup_request("Alice")).await);
    assert!(bob_app.session().signup(signup_request("Bob")).await);
    let bob = bob_app.session().auth_user().unwrap();

    assert!(wait_until(SETTLE, || alice_app.session().is_online(bob.id)).await);

    bob_app.logout().await;
    assert!(wait_until(SETTLE, || !alice_app.session().is_online(bob.id)).await);
}

#[tokio::test]
async fn test_logout_clears_session_and_closes_socket() {
    let server = TestServer::start().await.unwrap();
    let (app, mut notes) = server.client_app().unwrap();

    assert!(app.session().signup(signup_request("Erin")).await);
    assert!(wait_until(SETTLE, || !app.session().online_users().is_empty()).await);

    app.logout().await;

    let state = app.session().snapshot();
    assert!(state.auth_user.is_none());
    assert!(state.online_users.is_empty());
    assert!(!app.session().is_socket_connected());

    let mut last = None;
    while let Ok(note) = notes.try_recv() {
        last = Some(note);
    }
    assert_eq!(last, Some(Notification::Success("Logged out successfully".into())));
}

#[tokio::test]
async fn test_update_profile_keeps_socket() {
    let server = TestServer::start().await.unwrap();
    let (app, mut notes) = server.client_app().unwrap();
    assert!(app.session().signup(signup_request("Grace")).await);
    while notes.try_recv().is_ok() {}

    assert!(app.session().upload_profile_image("image/png", b"\x89PNG").await);
    let user = app.session().auth_user().unwrap();
    assert!(user.profile_pic.starts_with("data:image/png;base64,"));
    assert!(app.session().is_socket_connected());
    assert_eq!(
        notes.recv().await.unwrap(),
        Notification::Success("Profile updated successfully".into())
    );

    assert!(!app.session().update_profile(UpdateProfileRequest::new("")).await);
    assert_eq!(
        notes.recv().await.unwrap(),
        Notification::Error("Profile pic is required".into())
    );
}
