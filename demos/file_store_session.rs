//! Demonstrates logging in with the default reqwest transport and keeping the credential pair in
//! a [`FileStore`] that survives restarts.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use jwt_session::{
	auth::LoginCredentials,
	config::ClientConfig,
	http::ReqwestTransport,
	reqwest::Client,
	session::{ApiClient, RecordingListener},
	store::FileStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/jwt/create");
			then.status(200).json_body(json!({ "access": "demo-access", "refresh": "demo-refresh" }));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/me/").header("authorization", "JWT demo-access");
			then.status(200).json_body(json!({ "id": 7, "email": "coach@example.com" }));
		})
		.await;
	let path = std::env::temp_dir().join("jwt-session-demo-tokens.json");
	let config = ClientConfig::builder().base_url(server.url("/api")).build()?;
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let listener = Arc::new(RecordingListener::default());
	let client = <ApiClient<ReqwestTransport>>::with_transport(
		config.clone(),
		Arc::new(FileStore::open(path.clone())?),
		transport.clone(),
	)
	.with_listener(listener.clone());

	client.login(&LoginCredentials::new("coach@example.com", "hunter2")).await?;

	login_mock.assert_async().await;

	println!("Credential pair written to {}.", path.display());

	// A second client over the same file picks the session up without logging in again.
	let reopened = <ApiClient<ReqwestTransport>>::with_transport(
		config,
		Arc::new(FileStore::open(path.clone())?),
		transport,
	);
	let me: serde_json::Value = reopened.execute_json("users/me/").await?;

	profile_mock.assert_async().await;

	println!("Profile fetched with the persisted token: {me}.");

	reopened.logout()?;

	println!("Logged out; session-expired events seen: {}.", listener.count());

	Ok(())
}
