//! Refresh step of the request wrapper: exchange the refresh token for a new access token, or
//! tear the session down.

// self
use crate::{
	_prelude::*,
	auth::{RefreshRequest, RefreshResponse, TokenSecret},
	config::RefreshPolicy,
	http::{ApiRequest, ApiTransport},
	obs::{CallKind, CallSpan, event},
	session::{ApiClient, SessionExpired},
	store::TokenKey,
};

/// Result of a refresh step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// A new access token was stored.
	Refreshed(TokenSecret),
	/// No token came back; credentials were purged and the listener notified.
	Expired,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Exchanges the stored refresh token for a new access token.
	///
	/// Any failure of the refresh call itself (rejection, network failure, body without
	/// `access`) counts as "no data": both tokens are deleted and the listener receives a
	/// [`SessionExpired`] event. Only local store failures are returned as errors.
	pub async fn refresh_access_token(&self) -> Result<RefreshOutcome> {
		let span = CallSpan::new(CallKind::Refresh, "refresh_access_token");

		span.instrument(async move {
			self.refresh_metrics.record_attempt();

			let refresh = self.store.get(TokenKey::RefreshToken)?;
			let request = ApiRequest::post(self.config.refresh_path.as_str()).with_json(
				&RefreshRequest { refresh: refresh.as_ref().map(TokenSecret::expose) },
			)?;
			let presented = self.access_token()?;
			let issued = match self.send_with(CallKind::Refresh, &request, presented.as_ref()).await
			{
				Ok(response) => response
					.json::<RefreshResponse>()
					.ok()
					.map(|body| body.access)
					.filter(|access| !access.is_empty()),
				Err(_err) => {
					event!(debug, error = %_err, "Refresh call failed.");

					None
				},
			};

			match issued {
				Some(access) => {
					self.store.set(TokenKey::AccessToken, access.clone())?;
					self.refresh_metrics.record_success();

					event!(debug, "Access token refreshed.");

					Ok(RefreshOutcome::Refreshed(access))
				},
				None => {
					self.refresh_metrics.record_failure();
					self.expire_session()?;

					Ok(RefreshOutcome::Expired)
				},
			}
		})
		.await
	}

	/// Runs the refresh step according to the configured [`RefreshPolicy`].
	///
	/// `presented` is the access token the rejected request carried.
	pub(crate) async fn recover(&self, presented: Option<TokenSecret>) -> Result<RefreshOutcome> {
		match self.config.refresh_policy {
			RefreshPolicy::Independent => self.refresh_access_token().await,
			RefreshPolicy::Serialized => {
				let _guard = self.refresh_guard.lock().await;
				let current = self.access_token()?;

				match (presented, current) {
					// Rotated by another caller while this one waited.
					(Some(stale), Some(current)) if stale != current => {
						self.refresh_metrics.record_reuse();

						Ok(RefreshOutcome::Refreshed(current))
					},
					// Torn down by another caller while this one waited.
					(Some(_), None) => Ok(RefreshOutcome::Expired),
					_ => self.refresh_access_token().await,
				}
			},
		}
	}

	/// Purges both tokens and notifies the listener.
	///
	/// The listener is notified even when the purge fails; the store error is returned afterwards.
	fn expire_session(&self) -> Result<()> {
		let purged = self.store.purge();
		let event = SessionExpired {
			redirect_to: self.config.expiry_redirect.clone(),
			at: OffsetDateTime::now_utc(),
		};

		event!(warn, redirect_to = %event.redirect_to, "Refresh failed; session expired.");

		self.listener.on_session_expired(&event);

		Ok(purged?)
	}
}
