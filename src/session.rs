//! Authenticated request wrapper.
//!
//! [`ApiClient::execute`] reads the stored access token, attaches it as
//! `Authorization: <scheme> <token>`, and sends the request. When the backend rejects the token
//! (first envelope entry coded `token_not_valid`), the client performs exactly one
//! refresh-and-retry cycle: it posts the stored refresh token to the refresh endpoint, stores the
//! new access token, and re-sends the original request once. The retried outcome is final. If
//! the refresh yields no token, both tokens are purged, the [`SessionListener`] receives a
//! [`SessionExpired`] event, and the original error is returned.

mod account;
mod listener;
mod metrics;
mod refresh;

pub use listener::*;
pub use metrics::RefreshMetrics;
pub use refresh::RefreshOutcome;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, ApiTransport},
	obs::{self, CallKind, CallOutcome, CallSpan, event},
	store::{TokenKey, TokenStore},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// JWT-authenticated API client.
///
/// Cloning is cheap and clones share the transport, the store, the listener, the refresh
/// metrics, and the refresh guard used by [`RefreshPolicy::Serialized`](crate::config::RefreshPolicy).
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Store holding the credential pair.
	pub store: Arc<dyn TokenStore>,
	/// Endpoint and header configuration.
	pub config: Arc<ClientConfig>,
	/// Receiver of session-expired events.
	pub listener: Arc<dyn SessionListener>,
	/// Counters for refresh attempts.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client on top of a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn TokenStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			config: Arc::new(config),
			listener: Arc::new(NoopListener),
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Sets or replaces the session-expired listener.
	pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
		self.listener = listener;

		self
	}

	/// Sends `request` with the stored credential, refreshing and retrying once on a
	/// token-invalid rejection.
	///
	/// Non-2xx responses surface as [`Error::Api`]; transport failures and every API error other
	/// than the token-invalid sentinel are returned unchanged.
	pub async fn execute(&self, request: impl Into<ApiRequest>) -> Result<ApiResponse> {
		let request = request.into();
		let span = CallSpan::new(CallKind::Request, "execute");

		span.instrument(async move {
			let presented = self.access_token()?;
			let err = match self.send_with(CallKind::Request, &request, presented.as_ref()).await {
				Ok(response) => return Ok(response),
				Err(err) => err,
			};

			if !err.has_error_code(&self.config.invalid_token_code) {
				return Err(err);
			}

			event!(debug, path = %request.target, "Access token rejected; refreshing.");

			match self.recover(presented).await? {
				RefreshOutcome::Refreshed(_) => {
					let current = self.access_token()?;

					self.send_with(CallKind::Retry, &request, current.as_ref()).await
				},
				RefreshOutcome::Expired => Err(err),
			}
		})
		.await
	}

	/// [`ApiClient::execute`] followed by JSON decoding of the final response.
	pub async fn execute_json<R>(&self, request: impl Into<ApiRequest>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		Ok(self.execute(request).await?.json()?)
	}

	/// Stored access token; empty values count as absent.
	pub(crate) fn access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(TokenKey::AccessToken)?.filter(|token| !token.is_empty()))
	}

	/// Prepares `request`, authorizes it with `token` when present, and sends it once.
	pub(crate) async fn send_with(
		&self,
		kind: CallKind,
		request: &ApiRequest,
		token: Option<&TokenSecret>,
	) -> Result<ApiResponse> {
		let mut prepared = request.prepare(&self.config)?;

		if let Some(token) = token {
			prepared.authorize(&self.config.authorization_value(token.expose()))?;
		}

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = match self.transport.send(prepared).await {
			Ok(response) => response.error_for_status(),
			Err(err) => Err(err.into()),
		};

		obs::record_result(kind, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			listener: self.listener.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_policy", &self.config.refresh_policy)
			.finish()
	}
}
