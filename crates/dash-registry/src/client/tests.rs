//! Unit tests for the HTTP client and retry wrapper

use super::*;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header};

/// Client that replays scripted outcomes, then repeats a fallback forever
struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, DashError>>>,
    fallback: fn() -> Result<String, DashError>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(script: Vec<Result<String, DashError>>, fallback: fn() -> Result<String, DashError>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    type Response = String;
    type Error = DashError;

    async fn get(&self, _url: &str) -> Result<String, DashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(self.fallback)
    }
}

fn failure(message: &str) -> Result<String, DashError> {
    Err(DashError::Http { status: 401, message: message.to_string() })
}

fn success() -> Result<String, DashError> {
    Ok("some-data".to_string())
}

fn token_required() -> Result<String, DashError> {
    failure(BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG)
}

fn wrapped(client: ScriptedClient, recoverable: bool) -> RetryingClient<ScriptedClient> {
    if recoverable {
        RetryingClient::with_recoverable_error(client, BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG)
    } else {
        RetryingClient::new(client)
    }
}

#[tokio::test]
async fn test_no_retry_on_success_with_recoverable_message() {
    let client = wrapped(ScriptedClient::new(vec![], success), true);

    let result = client.get("some-url").await.unwrap();
    assert_eq!(result, "some-data");
    assert_eq!(client.inner().calls(), 1);
}

#[tokio::test]
async fn test_no_retry_on_success_without_recoverable_message() {
    let client = wrapped(ScriptedClient::new(vec![], success), false);

    let result = client.get("some-url").await.unwrap();
    assert_eq!(result, "some-data");
    assert_eq!(client.inner().calls(), 1);
}

#[tokio::test]
async fn test_retry_once_on_token_required() {
    let client = wrapped(ScriptedClient::new(vec![token_required()], success), true);

    let result = client.get("some-url").await.unwrap();
    assert_eq!(result, "some-data");
    assert_eq!(client.inner().calls(), 2);
}

#[tokio::test]
async fn test_retry_once_on_other_error() {
    let client = wrapped(ScriptedClient::new(vec![failure("some error message")], success), false);

    let result = client.get("some-url").await.unwrap();
    assert_eq!(result, "some-data");
    assert_eq!(client.inner().calls(), 2);
}

#[tokio::test]
async fn test_retry_twice() {
    let client = wrapped(
        ScriptedClient::new(vec![token_required(), token_required()], success),
        true,
    );
    assert_eq!(client.get("some-url").await.unwrap(), "some-data");
    assert_eq!(client.inner().calls(), 3);

    let client = wrapped(
        ScriptedClient::new(vec![failure("error 1"), failure("error 2")], success),
        false,
    );
    assert_eq!(client.get("some-url").await.unwrap(), "some-data");
    assert_eq!(client.inner().calls(), 3);
}

#[tokio::test]
async fn test_fail_after_three_retries_with_token_required() {
    let client = wrapped(
        ScriptedClient::new(
            vec![token_required(), token_required(), token_required()],
            token_required,
        ),
        true,
    );

    let error = client.get("some-url").await.unwrap_err();
    assert_eq!(error.to_string(), BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG);
    assert_eq!(client.inner().calls(), 4);
}

#[tokio::test]
async fn test_fail_after_three_retries_returns_last_error() {
    let client = wrapped(
        ScriptedClient::new(
            vec![failure("error 1"), failure("error 2"), failure("error 3")],
            || Err(DashError::Http { status: 503, message: "error 4".to_string() }),
        ),
        false,
    );

    let error = client.get("some-url").await.unwrap_err();
    assert_eq!(error.to_string(), "error 4");
    // The 4th error itself, not a wrapper around it
    assert!(matches!(error, DashError::Http { status: 503, .. }));
    assert_eq!(client.inner().calls(), 4);
}

#[tokio::test]
async fn test_unmatched_message_still_uses_full_budget() {
    let client = wrapped(
        ScriptedClient::new(vec![], || failure("something else")),
        true,
    );

    let error = client.get("some-url").await.unwrap_err();
    assert_eq!(error.to_string(), "something else");
    assert_eq!(client.inner().calls(), (MAX_RETRIES + 1) as usize);
}

proptest! {
    #[test]
    fn prop_succeeds_after_up_to_three_failures(
        failures in 0usize..=3,
        recoverable in any::<bool>(),
        matching in any::<bool>(),
    ) {
        let script = (0..failures)
            .map(|i| if matching { token_required() } else { failure(&format!("error {}", i)) })
            .collect();
        let client = wrapped(ScriptedClient::new(script, success), recoverable);

        let result = tokio_test::block_on(client.get("some-url"));
        prop_assert_eq!(result.unwrap(), "some-data");
        prop_assert_eq!(client.inner().calls(), failures + 1);
    }

    #[test]
    fn prop_four_failures_surface_the_fourth(recoverable in any::<bool>()) {
        let client = wrapped(
            ScriptedClient::new(
                vec![failure("error 1"), failure("error 2"), failure("error 3"), failure("error 4")],
                success,
            ),
            recoverable,
        );

        let error = tokio_test::block_on(client.get("some-url")).unwrap_err();
        prop_assert_eq!(error.to_string(), "error 4");
        prop_assert_eq!(client.inner().calls(), 4);
    }
}

#[tokio::test]
async fn test_reqwest_client_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devfiles/index.json"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "displayName": "java-maven", "tags": ["Java"], "links": {} }
        ])))
        .mount(&mock_server)
        .await;

    let client = ReqwestClient::new().unwrap();
    let response = client
        .get(&format!("{}/devfiles/index.json", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let records: Vec<crate::api::DevfileMetaData> = response.json().unwrap();
    assert_eq!(records[0].display_name, "java-maven");
}

#[tokio::test]
async fn test_reqwest_client_uses_json_message_of_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/workspace"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "statusCode": 401,
            "error": "Unauthorized",
            "message": BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG
        })))
        .mount(&mock_server)
        .await;

    let client = ReqwestClient::new().unwrap();
    let error = client
        .get(&format!("{}/api/workspace", mock_server.uri()))
        .await
        .unwrap_err();

    match error {
        DashError::Http { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG);
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reqwest_client_plain_text_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/non-existing-group/v1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found\n"))
        .mount(&mock_server)
        .await;

    let client = ReqwestClient::new().unwrap();
    let error = client
        .get(&format!("{}/apis/non-existing-group/v1", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "404 page not found\n");
    assert_eq!(error.status(), Some(404));
}

#[tokio::test]
async fn test_reqwest_client_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = ReqwestClient::with_auth(AuthConfig {
        token: Some("test-token".to_string()),
        ..AuthConfig::default()
    })
    .unwrap();

    let response = client
        .get(&format!("{}/api/data", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_retrying_reqwest_client_recovers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG
        })))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = RetryingClient::with_recoverable_error(
        ReqwestClient::new().unwrap(),
        BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG,
    );
    let response = client
        .get(&format!("{}/api/data", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.text(), "ok");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[test]
fn test_failure_message_fallbacks() {
    let status = reqwest::StatusCode::BAD_GATEWAY;
    assert_eq!(failure_message(status, b""), "Bad Gateway");
    assert_eq!(failure_message(status, b"upstream down"), "upstream down");
    assert_eq!(failure_message(status, br#"{"message":"boom"}"#), "boom");
}
