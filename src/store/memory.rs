//! Thread-safe in-memory [`TokenStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	store::{StoreError, TokenKey, TokenStore},
};

/// Keeps tokens in-process; contents vanish with the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<HashMap<TokenKey, TokenSecret>>>);
impl MemoryStore {
	/// Returns a store pre-populated with `entries`.
	pub fn with_entries(entries: impl IntoIterator<Item = (TokenKey, TokenSecret)>) -> Self {
		Self(Arc::new(RwLock::new(entries.into_iter().collect())))
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self, key: TokenKey) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.0.read().get(&key).cloned())
	}

	fn set(&self, key: TokenKey, value: TokenSecret) -> Result<(), StoreError> {
		self.0.write().insert(key, value);

		Ok(())
	}

	fn delete(&self, key: TokenKey) -> Result<(), StoreError> {
		self.0.write().remove(&key);

		Ok(())
	}
}
