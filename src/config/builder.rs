// self
use crate::{
	_prelude::*,
	config::{
		ClientConfig, DEFAULT_AUTH_SCHEME, DEFAULT_BASE_URL, DEFAULT_EXPIRY_REDIRECT,
		DEFAULT_LOGIN_PATH, DEFAULT_REFRESH_PATH, DEFAULT_VERIFY_PATH, RefreshPolicy,
		normalize_base,
	},
	envelope::TOKEN_NOT_VALID,
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values; every field defaults to the production setting.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfigBuilder {
	/// Backend base URL.
	pub base_url: String,
	/// Refresh endpoint path.
	pub refresh_path: String,
	/// Login endpoint path.
	pub login_path: String,
	/// Verify endpoint path.
	pub verify_path: String,
	/// `Authorization` header scheme.
	pub auth_scheme: String,
	/// Error code that triggers a refresh.
	pub invalid_token_code: String,
	/// Redirect target carried by session-expired events.
	pub expiry_redirect: String,
	/// Refresh coordination policy.
	pub refresh_policy: RefreshPolicy,
}
impl ClientConfigBuilder {
	/// Sets the backend base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Sets the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Sets the login endpoint path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Sets the verify endpoint path.
	pub fn verify_path(mut self, path: impl Into<String>) -> Self {
		self.verify_path = path.into();

		self
	}

	/// Sets the `Authorization` header scheme.
	pub fn auth_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.auth_scheme = scheme.into();

		self
	}

	/// Sets the error code that triggers a refresh.
	pub fn invalid_token_code(mut self, code: impl Into<String>) -> Self {
		self.invalid_token_code = code.into();

		self
	}

	/// Sets the redirect target carried by session-expired events.
	pub fn expiry_redirect(mut self, target: impl Into<String>) -> Self {
		self.expiry_redirect = target.into();

		self
	}

	/// Sets the refresh coordination policy.
	pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Validates the inputs and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = normalize_base(&self.base_url)?;

		for (field, value) in [
			("refresh_path", &self.refresh_path),
			("login_path", &self.login_path),
			("verify_path", &self.verify_path),
			("auth_scheme", &self.auth_scheme),
			("invalid_token_code", &self.invalid_token_code),
			("expiry_redirect", &self.expiry_redirect),
		] {
			if value.trim().is_empty() {
				return Err(ConfigError::Empty { field });
			}
		}
		if self.auth_scheme.chars().any(|c| c.is_whitespace() || c.is_control()) {
			return Err(ConfigError::InvalidHeader { name: "Authorization".into() });
		}

		Ok(ClientConfig {
			base_url,
			refresh_path: self.refresh_path,
			login_path: self.login_path,
			verify_path: self.verify_path,
			auth_scheme: self.auth_scheme,
			invalid_token_code: self.invalid_token_code,
			expiry_redirect: self.expiry_redirect,
			refresh_policy: self.refresh_policy,
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			refresh_path: DEFAULT_REFRESH_PATH.into(),
			login_path: DEFAULT_LOGIN_PATH.into(),
			verify_path: DEFAULT_VERIFY_PATH.into(),
			auth_scheme: DEFAULT_AUTH_SCHEME.into(),
			invalid_token_code: TOKEN_NOT_VALID.into(),
			expiry_redirect: DEFAULT_EXPIRY_REDIRECT.into(),
			refresh_policy: RefreshPolicy::default(),
		}
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}
