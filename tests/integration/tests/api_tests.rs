//! REST API tests against an in-process server
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chat_core::{Message, SendMessageRequest, SignupRequest, User};
use integration_tests::{assert_error, assert_json, login_for, signup_request, TestServer};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = reqwest::get(format!("{}/health", server.origin())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_signup_sets_session_cookie() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();
    let request = signup_request("Alice");

    let response = server.post(&http, "/auth/signup", &request).await.unwrap();
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let user: User = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(user.email, request.email);
    assert!(user.profile_pic.is_empty());

    let response = server.get(&http, "/auth/check").await.unwrap();
    let checked: User = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(checked.id, user.id);
}

#[tokio::test]
async fn test_signup_validation_messages() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();

    let cases = [
        (SignupRequest::new("", "a@example.com", "secret1"), "All fields are required"),
        (SignupRequest::new("A", "", "secret1"), "All fields are required"),
        (SignupRequest::new("A", "a@example.com", "abc"), "Password must be at least 6 characters"),
        (SignupRequest::new("A", "not-an-email", "secret1"), "Invalid email format"),
    ];

    for (request, expected) in cases {
        let response = server.post(&http, "/auth/signup", &request).await.unwrap();
        let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(message, expected);
    }
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();
    let request = signup_request("Bob");

    server.post(&http, "/auth/signup", &request).await.unwrap();
    let response = server.post(&http, "/auth/signup", &request).await.unwrap();

    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Email already exists");
}

#[tokio::test]
async fn test_login_and_logout() {
    let server = TestServer::start().await.unwrap();
    let request = signup_request("Carol");
    server
        .post(&server.http().unwrap(), "/auth/signup", &request)
        .await
        .unwrap();

    let http = server.http().unwrap();
    let mut wrong = login_for(&request);
    wrong.password = "not-the-password".into();
    let response = server.post(&http, "/auth/login", &wrong).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "Invalid credentials"
    );

    let response = server.post(&http, "/auth/login", &login_for(&request)).await.unwrap();
    let user: User = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.full_name, request.full_name);

    let response = http.post(server.url("/auth/logout")).send().await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "Logged out successfully");

    let response = server.get(&http, "/auth/check").await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap(),
        "Unauthorized - No Token Provided"
    );
}

#[tokio::test]
async fn test_update_profile() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();
    server
        .post(&http, "/auth/signup", &signup_request("Dave"))
        .await
        .unwrap();

    let response = http
        .put(server.url("/auth/update-profile"))
        .json(&json!({ "profilePic": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "Profile pic is required"
    );

    let response = http
        .put(server.url("/auth/update-profile"))
        .json(&json!({ "profilePic": "data:image/png;base64,AA==" }))
        .send()
        .await
        .unwrap();
    let user: User = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.profile_pic, "data:image/png;base64,AA==");
}

#[tokio::test]
async fn test_conversation_flow() {
    let server = TestServer::start().await.unwrap();
    let alice_http = server.http().unwrap();
    let bob_http = server.http().unwrap();

    let response = server
        .post(&alice_http, "/auth/signup", &signup_request("Alice"))
        .await
        .unwrap();
    let alice: User = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .post(&bob_http, "/auth/signup", &signup_request("Bob"))
        .await
        .unwrap();
    let bob: User = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server.get(&alice_http, "/message/user").await.unwrap();
    let contacts: Vec<User> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(contacts.iter().map(|u| u.id).collect::<Vec<_>>(), vec![bob.id]);

    let to_bob = format!("/message/send/{}", bob.id);
    let to_alice = format!("/message/send/{}", alice.id);
    let first: Message = assert_json(
        server
            .post(&alice_http, &to_bob, &SendMessageRequest::text("hi bob"))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let second: Message = assert_json(
        server
            .post(&bob_http, &to_alice, &SendMessageRequest::text("hi alice"))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    assert_eq!(first.sender_id, alice.id);
    assert_eq!(first.receiver_id, bob.id);

    let response = server
        .get(&alice_http, &format!("/message/{}", bob.id))
        .await
        .unwrap();
    let history: Vec<Message> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history, vec![first, second]);
}

#[tokio::test]
async fn test_send_empty_message_rejected() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();
    let other_http = server.http().unwrap();
    server
        .post(&http, "/auth/signup", &signup_request("Erin"))
        .await
        .unwrap();
    let response = server
        .post(&other_http, "/auth/signup", &signup_request("Frank"))
        .await
        .unwrap();
    let frank: User = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post(&http, &format!("/message/send/{}", frank.id), &json!({ "text": "   " }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_message_routes_require_session() {
    let server = TestServer::start().await.unwrap();
    let http = server.http().unwrap();

    let response = server.get(&http, "/message/user").await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
