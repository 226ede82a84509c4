//! End-to-end tests over a real HTTP transport.
//!
//! These exercise the full wiring: [`ReqwestTransport`] against a
//! wiremock server, with login, authenticated calls, and the reactive
//! refresh-and-replay path.

use std::sync::Arc;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tupasaje_client::adapters::mock::InMemoryCredentials;
use tupasaje_client::adapters::ReqwestTransport;
use tupasaje_client::auth::Credentials;
use tupasaje_client::client::ApiClient;
use tupasaje_client::error::ApiError;
use tupasaje_client::services::{AuthService, WalletService};
use tupasaje_client::session::SessionState;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tupasaje_client=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer, credentials: &InMemoryCredentials) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(
        server.uri(),
        Arc::new(ReqwestTransport::new()),
        Arc::new(credentials.clone()),
    ))
}

#[tokio::test]
async fn test_login_then_authenticated_request() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "phone": "+59170000001",
            "pin": "1234"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "token_type": "Bearer",
            "expires_in": 900,
            "user_id": "user-7"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wallet/balance"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "amount_cents": 2500,
            "currency": "BOB"
        })))
        .mount(&server)
        .await;

    let credentials = InMemoryCredentials::new();
    let client = client_for(&server, &credentials);
    let session = SessionState::new();
    let auth = AuthService::new(Arc::clone(&client), session.clone());

    auth.login("+59170000001", "1234").await.unwrap();
    assert!(session.is_authenticated());

    let wallet = WalletService::new(Arc::clone(&client));
    let balance = wallet.balance().await.unwrap();
    assert_eq!(balance.amount_cents, 2500);
}

#[tokio::test]
async fn test_401_triggers_refresh_and_replay_over_http() {
    init_tracing();
    let server = MockServer::start().await;

    // The stale token is rejected; the fresh one is accepted.
    Mock::given(method("GET"))
        .and(path("/wallet/balance"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wallet/balance"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "amount_cents": 800,
            "currency": "BOB"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({ "refresh_token": "R1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh",
            "refresh_token": "R2",
            "token_type": "Bearer",
            "expires_in": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = InMemoryCredentials::with_credentials(Credentials::pair("stale", "R1"));
    let client = client_for(&server, &credentials);

    let wallet = WalletService::new(Arc::clone(&client));
    let balance = wallet.balance().await.unwrap();
    assert_eq!(balance.amount_cents, 800);

    let stored = credentials.get_credentials().unwrap();
    assert_eq!(stored.access_token, Some("fresh".to_string()));
    assert_eq!(stored.refresh_token, Some("R2".to_string()));
}

#[tokio::test]
async fn test_refresh_rejected_over_http_clears_credentials() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wallet/balance"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_string("refresh token revoked"))
        .mount(&server)
        .await;

    let credentials = InMemoryCredentials::with_credentials(Credentials::pair("stale", "R1"));
    let client = client_for(&server, &credentials);

    let wallet = WalletService::new(Arc::clone(&client));
    let result = wallet.balance().await;
    assert!(matches!(result, Err(ApiError::RefreshFailed { status: 401, .. })));
    assert!(credentials.get_credentials().is_none());
}

#[tokio::test]
async fn test_logout_tears_down_even_when_server_is_gone() {
    init_tracing();
    let server = MockServer::start().await;
    let credentials = InMemoryCredentials::with_credentials(Credentials::pair("A1", "R1"));
    let client = client_for(&server, &credentials);
    let session = SessionState::new();
    session.set_authenticated(true);
    let auth = AuthService::new(Arc::clone(&client), session.clone());

    // Shut the server down so the logout call fails in transit.
    drop(server);

    auth.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert!(credentials.get_credentials().is_none());
}
