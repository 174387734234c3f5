#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result as EyreResult;
use httpmock::prelude::*;
use serde_json::{Value as JsonValue, json};
// self
use jwt_session::{
	auth::{CredentialPair, LoginCredentials},
	config::ClientConfig,
	error::Error,
	http::{ApiRequest, ReqwestTransport},
	reqwest::Client as ReqwestClient,
	session::{ApiClient, RecordingListener},
	store::{MemoryStore, TokenKey, TokenStore},
};

type TestClient = ApiClient<ReqwestTransport>;

fn build_test_client_with(
	config: ClientConfig,
) -> (TestClient, Arc<MemoryStore>, Arc<RecordingListener>) {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");
	let store = Arc::new(MemoryStore::default());
	let listener = Arc::new(RecordingListener::default());
	let api = ApiClient::with_transport(config, store.clone(), ReqwestTransport::with_client(client))
		.with_listener(listener.clone());

	(api, store, listener)
}

fn build_test_client(base_url: &str) -> (TestClient, Arc<MemoryStore>, Arc<RecordingListener>) {
	let config = ClientConfig::builder()
		.base_url(base_url)
		.build()
		.expect("Test base URL should produce a valid client config.");

	build_test_client_with(config)
}

fn token_not_valid() -> JsonValue {
	json!({
		"type": "client_error",
		"errors": [{
			"code": "token_not_valid",
			"detail": "Given token not valid for any token type",
			"attr": null
		}]
	})
}

fn stored(store: &dyn TokenStore, key: TokenKey) -> Option<String> {
	store
		.get(key)
		.expect("Memory store reads should not fail.")
		.map(|secret| secret.expose().to_owned())
}

#[tokio::test]
async fn stored_access_token_is_sent_as_jwt_header() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A1", "R1"))?;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/me/").header("authorization", "JWT A1");
			then.status(200).json_body(json!({ "id": 7, "email": "coach@example.com" }));
		})
		.await;
	let me: JsonValue = client.execute_json("users/me/").await?;

	mock.assert_async().await;

	assert_eq!(me["id"], 7);

	Ok(())
}

#[tokio::test]
async fn missing_access_token_sends_no_authorization_header() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, _, _) = build_test_client(&server.url("/api"));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/training-plans/").header_missing("authorization");
			then.status(200).json_body(json!([]));
		})
		.await;
	let response = client.execute("training-plans/").await?;

	mock.assert_async().await;

	assert!(response.is_success());

	Ok(())
}

#[tokio::test]
async fn token_not_valid_refreshes_then_retries_once() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A1", "R1"))?;

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diet-plans/").header("authorization", "JWT A1");
			then.status(401).json_body(token_not_valid());
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/jwt/refresh")
				.json_body(json!({ "refresh": "R1" }));
			then.status(200).json_body(json!({ "access": "T2" }));
		})
		.await;
	let retried = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diet-plans/").header("authorization", "JWT T2");
			then.status(200).json_body(json!([{ "id": 1 }]));
		})
		.await;
	let plans: Vec<JsonValue> = client.execute_json("diet-plans/").await?;

	rejected.assert_async().await;
	refresh.assert_async().await;
	retried.assert_async().await;

	assert_eq!(plans.len(), 1);
	assert_eq!(stored(&*store, TokenKey::AccessToken).as_deref(), Some("T2"));
	assert_eq!(stored(&*store, TokenKey::RefreshToken).as_deref(), Some("R1"));
	assert_eq!(listener.count(), 0);
	assert_eq!(client.refresh_metrics.successes(), 1);

	Ok(())
}

#[tokio::test]
async fn retried_request_failure_is_final() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A1", "R1"))?;

	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/clients/");
			then.status(401).json_body(token_not_valid());
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/refresh");
			then.status(200).json_body(json!({ "access": "T2" }));
		})
		.await;
	let err = client.execute("clients/").await.expect_err("Retried 401 must surface.");

	resource.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(401));
	assert!(err.has_error_code("token_not_valid"));
	assert_eq!(stored(&*store, TokenKey::AccessToken).as_deref(), Some("T2"));
	assert_eq!(listener.count(), 0);

	Ok(())
}

#[tokio::test]
async fn failed_refresh_purges_tokens_and_expires_session() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A1", "R-expired"))?;

	let resource = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/users/7/");
			then.status(401).json_body(token_not_valid());
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/refresh");
			then.status(401).json_body(token_not_valid());
		})
		.await;
	let err = client
		.execute(ApiRequest::patch("users/7/").with_body(json!({ "first_name": "Ann" })))
		.await
		.expect_err("Original rejection must surface after a failed refresh.");

	resource.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(401));
	assert!(store.is_empty());

	let events = listener.events();

	assert_eq!(events.len(), 1);
	assert_eq!(events[0].redirect_to, "/");
	assert_eq!(client.refresh_metrics.failures(), 1);

	Ok(())
}

#[tokio::test]
async fn other_error_codes_skip_refresh() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A1", "R1"))?;

	let body = json!({
		"type": "client_error",
		"errors": [{
			"code": "permission_denied",
			"detail": "You do not have permission to perform this action.",
			"attr": null
		}]
	});
	let resource = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/training-plans/3/");
			then.status(403).json_body(body.clone());
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/refresh");
			then.status(200).json_body(json!({ "access": "T2" }));
		})
		.await;
	let err = client
		.execute(ApiRequest::delete("training-plans/3/"))
		.await
		.expect_err("Permission errors must surface.");

	resource.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	let (status, returned) = match err {
		Error::Api { status, body } => (status, body),
		other => panic!("Expected an API error, got {other:?}."),
	};

	assert_eq!(status, 403);
	assert_eq!(returned, body);
	assert_eq!(stored(&*store, TokenKey::AccessToken).as_deref(), Some("A1"));
	assert_eq!(listener.count(), 0);

	Ok(())
}

#[tokio::test]
async fn transport_errors_propagate_without_refresh() -> EyreResult<()> {
	// Nothing listens on the discard port.
	let (client, store, listener) = build_test_client("http://127.0.0.1:9/api");

	store.save_pair(&CredentialPair::new("A1", "R1"))?;

	let err = client.execute("users/me/").await.expect_err("Closed port must fail.");

	assert!(matches!(err, Error::Transport(_)), "{err:?}");
	assert_eq!(client.refresh_metrics.attempts(), 0);
	assert_eq!(stored(&*store, TokenKey::AccessToken).as_deref(), Some("A1"));
	assert_eq!(listener.count(), 0);

	Ok(())
}

#[tokio::test]
async fn login_stores_pair_and_verify_reports_validity() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder().base_url(server.url("/api")).build()?;
	let (client, store, _) = build_test_client_with(config);
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/jwt/create")
				.header_missing("authorization")
				.json_body(json!({ "email": "coach@example.com", "password": "hunter2" }));
			then.status(200).json_body(json!({ "access": "A1", "refresh": "R1" }));
		})
		.await;
	let verify = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/verify").json_body(json!({ "token": "A1" }));
			then.status(200).json_body(json!({}));
		})
		.await;
	let pair = client.login(&LoginCredentials::new("coach@example.com", "hunter2")).await?;

	login.assert_async().await;

	assert_eq!(pair, CredentialPair::new("A1", "R1"));
	assert_eq!(client.credentials()?, Some(pair));
	assert!(client.verify().await?);

	verify.assert_async().await;

	client.logout()?;

	assert!(store.is_empty());
	assert!(!client.verify().await?);

	verify.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn empty_stored_access_token_sends_no_authorization_header() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_test_client(&server.url("/api"));

	store.set(TokenKey::AccessToken, "".into())?;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/me/").header_missing("authorization");
			then.status(200).json_body(json!({ "id": 7 }));
		})
		.await;
	let response = client.execute("users/me/").await?;

	mock.assert_async().await;

	assert!(response.is_success());

	Ok(())
}

#[tokio::test]
async fn verify_reports_rejected_token_as_invalid() -> EyreResult<()> {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_test_client(&server.url("/api"));

	store.save_pair(&CredentialPair::new("A-stale", "R1"))?;

	let verify = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/jwt/verify")
				.header_missing("authorization")
				.json_body(json!({ "token": "A-stale" }));
			then.status(401).json_body(token_not_valid());
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/refresh");
			then.status(200).json_body(json!({ "access": "T2" }));
		})
		.await;

	assert!(!client.verify().await?);

	verify.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(stored(&*store, TokenKey::AccessToken).as_deref(), Some("A-stale"));
	assert_eq!(listener.count(), 0);

	Ok(())
}
