//! Demonstrates plugging an in-process [`ApiTransport`] into [`ApiClient`].
//!
//! 1. Implement [`ApiTransport::send`] and answer from any source (here: a token-aware fake backend).
//! 2. Seed a [`MemoryStore`] with a credential pair whose access token the backend rejects.
//! 3. Watch the client refresh, retry once, and then tear the session down once the refresh token
//!    is revoked too.

// std
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};
// crates.io
use color_eyre::Result;
use http::{StatusCode, header::AUTHORIZATION};
use serde_json::json;
// self
use jwt_session::{
	auth::CredentialPair,
	config::ClientConfig,
	http::{ApiResponse, ApiTransport, PreparedRequest, TransportFuture},
	session::{ApiClient, SessionExpired},
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::default());
	let backend = Arc::new(FakeBackend::default());
	let config = ClientConfig::builder().base_url("https://backend.invalid/api").build()?;
	let client: ApiClient<FakeBackend> = ApiClient::with_transport(config, store.clone(), backend.clone()).with_listener(
		Arc::new(|event: &SessionExpired| {
			println!("Session expired at {}; redirecting to {}.", event.at, event.redirect_to);
		}),
	);

	store.save_pair(&CredentialPair::new("stale-access", "live-refresh"))?;

	let me: serde_json::Value = client.execute_json("users/me/").await?;

	println!("Profile fetched after one refresh: {me}.");

	backend.revoke_refresh();
	store.save_pair(&CredentialPair::new("stale-access", "live-refresh"))?;

	match client.execute("users/me/").await {
		Ok(_) => println!("Fake backend unexpectedly accepted a stale token."),
		Err(e) => println!("Original rejection returned after the failed refresh: {e}."),
	}

	println!("Tokens left in the store: {}.", store.len());

	Ok(())
}

/// Accepts only `JWT fresh-access` and issues it from the refresh endpoint until revoked.
#[derive(Default)]
struct FakeBackend {
	refresh_revoked: AtomicBool,
}
impl FakeBackend {
	fn revoke_refresh(&self) {
		self.refresh_revoked.store(true, Ordering::SeqCst);
	}
}
impl ApiTransport for FakeBackend {
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let rejected = json!({
				"type": "client_error",
				"errors": [{ "code": "token_not_valid", "detail": "Token is invalid or expired", "attr": null }]
			});

			if request.url.path().ends_with("/auth/jwt/refresh") {
				if self.refresh_revoked.load(Ordering::SeqCst) {
					return Ok(ApiResponse::json_response(StatusCode::UNAUTHORIZED, &rejected));
				}

				return Ok(ApiResponse::json_response(
					StatusCode::OK,
					&json!({ "access": "fresh-access" }),
				));
			}

			let authorized = request
				.headers
				.get(AUTHORIZATION)
				.is_some_and(|value| value.as_bytes() == b"JWT fresh-access");

			if authorized && !self.refresh_revoked.load(Ordering::SeqCst) {
				Ok(ApiResponse::json_response(
					StatusCode::OK,
					&json!({ "id": 7, "email": "coach@example.com" }),
				))
			} else {
				Ok(ApiResponse::json_response(StatusCode::UNAUTHORIZED, &rejected))
			}
		})
	}
}
