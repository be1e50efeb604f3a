//! Account endpoints against a mock GoBarber API.

use gobarber_core::api::{AccountApi, ApiClient, ApiError};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn account(server: &MockServer) -> AccountApi {
    AccountApi::new(ApiClient::new(server.uri()).unwrap())
}

#[tokio::test]
async fn test_sign_up_returns_created_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "Foo", "email": "foo@example.com", "password": "123456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "name": "Foo",
            "email": "foo@example.com",
            "avatar_url": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = account(&server).sign_up("Foo", "foo@example.com", "123456").await.unwrap();
    assert_eq!(user.id, "u-1");
    assert_eq!(user.avatar_url, None);
}

#[tokio::test]
async fn test_sign_up_duplicate_email_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "Email address already used."
        })))
        .mount(&server)
        .await;

    let err = account(&server).sign_up("Foo", "foo@example.com", "123456").await.unwrap_err();
    match err {
        ApiError::BadRequest(message) => assert_eq!(message, "Email address already used."),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_forgot_password_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/forgot"))
        .and(body_json(json!({"email": "foo.bar@example.com"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    account(&server).forgot_password("foo.bar@example.com").await.unwrap();
}

#[tokio::test]
async fn test_reset_password_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/reset"))
        .and(body_json(json!({
            "password": "123456",
            "password_confirmation": "123456",
            "token": "reset-token"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    account(&server)
        .reset_password("123456", "123456", "reset-token")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_password_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/reset"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = account(&server)
        .reset_password("123456", "123456", "reset-token")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerError(_)));
}

#[tokio::test]
async fn test_update_avatar_uploads_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/users/avatar"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "123",
            "name": "Foo",
            "email": "foo@example.com",
            "avatar_url": "http://localhost:3333/files/avatar.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = account(&server)
        .update_avatar("avatar.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert_eq!(user.avatar_url.as_deref(), Some("http://localhost:3333/files/avatar.png"));
}

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password/forgot"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/password/forgot"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    account(&server).forgot_password("foo@example.com").await.unwrap();
}
