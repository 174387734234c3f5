//! Credential lifecycle around the wrapper: login, verification, logout.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, LoginCredentials, VerifyRequest},
	http::{ApiRequest, ApiTransport},
	obs::{CallKind, CallSpan, event},
	session::ApiClient,
};

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Obtains a fresh credential pair with email/password and stores it.
	///
	/// Sent without an `Authorization` header and never routed through the refresh cycle.
	pub async fn login(&self, credentials: &LoginCredentials) -> Result<CredentialPair> {
		let span = CallSpan::new(CallKind::Login, "login");

		span.instrument(async move {
			let request =
				ApiRequest::post(self.config.login_path.as_str()).with_json(credentials)?;
			let pair: CredentialPair =
				self.send_with(CallKind::Login, &request, None).await?.json()?;

			self.store.save_pair(&pair)?;

			event!(debug, "Credential pair stored.");

			Ok(pair)
		})
		.await
	}

	/// Asks the backend whether the stored access token is still valid.
	///
	/// Returns `false` without a network call when no token is stored, and `false` when the
	/// backend rejects the token with 400 or 401. Other failures are returned as errors.
	pub async fn verify(&self) -> Result<bool> {
		let span = CallSpan::new(CallKind::Verify, "verify");

		span.instrument(async move {
			let Some(token) = self.access_token()? else {
				return Ok(false);
			};
			let request = ApiRequest::post(self.config.verify_path.as_str())
				.with_json(&VerifyRequest { token: token.expose() })?;

			match self.send_with(CallKind::Verify, &request, None).await {
				Ok(_) => Ok(true),
				Err(Error::Api { status: 400 | 401, .. }) => Ok(false),
				Err(err) => Err(err),
			}
		})
		.await
	}

	/// Deletes both stored tokens. No session-expired event is emitted.
	pub fn logout(&self) -> Result<()> {
		self.store.purge()?;

		Ok(())
	}

	/// Returns the stored credential pair, if both halves are present.
	pub fn credentials(&self) -> Result<Option<CredentialPair>> {
		Ok(self.store.load_pair()?)
	}
}
