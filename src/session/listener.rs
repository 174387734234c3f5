//! Session-expired notifications handed back to the host application.

// self
use crate::_prelude::*;

/// Emitted once the client has purged its credentials after a failed refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExpired {
	/// Where the host should navigate (the application root by default).
	pub redirect_to: String,
	/// When the session was torn down.
	#[serde(with = "time::serde::rfc3339")]
	pub at: OffsetDateTime,
}

/// Receiver of session lifecycle events.
///
/// Called synchronously from the task that observed the failure, after the store has been
/// purged. Implementations should return quickly; navigation belongs to the host.
pub trait SessionListener
where
	Self: Send + Sync,
{
	/// Invoked when the refresh token could not produce a new access token.
	fn on_session_expired(&self, event: &SessionExpired);
}
impl<F> SessionListener for F
where
	F: Fn(&SessionExpired) + Send + Sync,
{
	fn on_session_expired(&self, event: &SessionExpired) {
		self(event)
	}
}

/// Listener that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;
impl SessionListener for NoopListener {
	fn on_session_expired(&self, _: &SessionExpired) {}
}

/// Listener that keeps every event, for hosts that poll instead of reacting.
#[derive(Debug, Default)]
pub struct RecordingListener(Mutex<Vec<SessionExpired>>);
impl RecordingListener {
	/// Snapshot of received events, oldest first.
	pub fn events(&self) -> Vec<SessionExpired> {
		self.0.lock().clone()
	}

	/// Number of received events.
	pub fn count(&self) -> usize {
		self.0.lock().len()
	}

	/// Removes and returns every received event.
	pub fn drain(&self) -> Vec<SessionExpired> {
		std::mem::take(&mut *self.0.lock())
	}
}
impl SessionListener for RecordingListener {
	fn on_session_expired(&self, event: &SessionExpired) {
		self.0.lock().push(event.clone());
	}
}
