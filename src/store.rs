//! Storage contract and built-in key-value stores for the client's credential pair.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
};

/// Key-value backend holding the credential pair.
///
/// Reads and writes are synchronous and last-write-wins; implementations only need to be safe to
/// share across tasks.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: TokenKey) -> Result<Option<TokenSecret>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: TokenKey, value: TokenSecret) -> Result<(), StoreError>;

	/// Removes `key`. Removing a missing key is not an error.
	fn delete(&self, key: TokenKey) -> Result<(), StoreError>;

	/// Writes both halves of `pair`.
	fn save_pair(&self, pair: &CredentialPair) -> Result<(), StoreError> {
		self.set(TokenKey::AccessToken, pair.access.clone())?;
		self.set(TokenKey::RefreshToken, pair.refresh.clone())
	}

	/// Returns the stored pair when both halves are present.
	fn load_pair(&self) -> Result<Option<CredentialPair>, StoreError> {
		let access = self.get(TokenKey::AccessToken)?;
		let refresh = self.get(TokenKey::RefreshToken)?;

		Ok(access.zip(refresh).map(|(access, refresh)| CredentialPair { access, refresh }))
	}

	/// Removes both tokens.
	///
	/// Both deletes are always attempted; the first failure is returned.
	fn purge(&self) -> Result<(), StoreError> {
		let refresh = self.delete(TokenKey::RefreshToken);
		let access = self.delete(TokenKey::AccessToken);

		refresh.and(access)
	}
}

/// Keys the client reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKey {
	/// Current access token (`accessToken`).
	#[serde(rename = "accessToken")]
	AccessToken,
	/// Current refresh token (`refreshToken`).
	#[serde(rename = "refreshToken")]
	RefreshToken,
}
impl TokenKey {
	/// Returns the storage key string.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKey::AccessToken => "accessToken",
			TokenKey::RefreshToken => "refreshToken",
		}
	}
}
impl Display for TokenKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
