//! Client configuration: backend location, JWT endpoint paths, header scheme, and refresh policy.

mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, envelope::TOKEN_NOT_VALID, error::ConfigError};

/// Production backend the client talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://www.well-coach.ru/api";
/// Path of the access-token refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "auth/jwt/refresh";
/// Path of the email/password token endpoint.
pub const DEFAULT_LOGIN_PATH: &str = "auth/jwt/create";
/// Path of the token verification endpoint.
pub const DEFAULT_VERIFY_PATH: &str = "auth/jwt/verify";
/// Scheme prefix of the `Authorization` header.
pub const DEFAULT_AUTH_SCHEME: &str = "JWT";
/// Location the host should navigate to once the session is torn down.
pub const DEFAULT_EXPIRY_REDIRECT: &str = "/";

/// How concurrent token-invalid failures coordinate their refresh calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
	/// Every failing request issues its own refresh call.
	#[default]
	Independent,
	/// Refresh calls run one at a time; late arrivals reuse a token rotated while they waited.
	Serialized,
}

/// Validated client configuration.
///
/// Build one with [`ClientConfig::builder`], take [`ClientConfig::default`] for the production
/// backend, or deserialize it from JSON (same field names as [`ClientConfigBuilder`]).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// Base URL every relative request path is joined onto; always ends with `/`.
	pub base_url: Url,
	/// Relative path of the refresh endpoint.
	pub refresh_path: String,
	/// Relative path of the login endpoint.
	pub login_path: String,
	/// Relative path of the verify endpoint.
	pub verify_path: String,
	/// `Authorization` header scheme.
	pub auth_scheme: String,
	/// First-entry error code that triggers a refresh.
	pub invalid_token_code: String,
	/// Redirect target carried by session-expired events.
	pub expiry_redirect: String,
	/// Refresh coordination policy.
	pub refresh_policy: RefreshPolicy,
}
impl ClientConfig {
	/// Returns a builder seeded with production defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Parses a JSON document into a validated configuration.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de).map_err(ConfigError::Parse)
	}

	/// Resolves a request target.
	///
	/// Targets starting with `http://` or `https://` are parsed as absolute URLs; anything else is
	/// treated as a path relative to [`ClientConfig::base_url`], ignoring leading slashes.
	pub fn endpoint(&self, target: &str) -> Result<Url, ConfigError> {
		let lowered = target.get(..8).unwrap_or(target).to_ascii_lowercase();

		if lowered.starts_with("http://") || lowered.starts_with("https://") {
			return Url::parse(target).map_err(|source| ConfigError::InvalidEndpoint {
				path: target.to_owned(),
				source,
			});
		}

		// `./` keeps a leading `segment:` from being read as a scheme.
		self.base_url.join(&format!("./{}", target.trim_start_matches('/'))).map_err(|source| {
			ConfigError::InvalidEndpoint { path: target.to_owned(), source }
		})
	}

	/// Formats the `Authorization` header value for `token`.
	pub fn authorization_value(&self, token: &str) -> String {
		format!("{} {token}", self.auth_scheme)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: normalize_base(DEFAULT_BASE_URL)
				.unwrap_or_else(|_| unreachable!("default base URL is a valid absolute URL")),
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

pub(crate) fn normalize_base(raw: &str) -> Result<Url, ConfigError> {
	let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
		value: raw.to_owned(),
		source: Some(source),
	})?;

	if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::InvalidBaseUrl { value: raw.to_owned(), source: None });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_points_at_production_backend() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url.as_str(), "https://www.well-coach.ru/api/");
		assert_eq!(
			config.endpoint(&config.refresh_path).expect("Refresh path should resolve.").as_str(),
			"https://www.well-coach.ru/api/auth/jwt/refresh"
		);
		assert_eq!(config.authorization_value("abc"), "JWT abc");
		assert_eq!(config.refresh_policy, RefreshPolicy::Independent);
	}

	#[test]
	fn endpoint_handles_slashes_and_absolute_targets() {
		let config = ClientConfig::default();

		assert_eq!(
			config.endpoint("/users/me/").expect("Leading slash should resolve.").as_str(),
			"https://www.well-coach.ru/api/users/me/"
		);
		assert_eq!(
			config
				.endpoint("https://cdn.example.com/file.json")
				.expect("Absolute URL should pass through.")
				.as_str(),
			"https://cdn.example.com/file.json"
		);
		assert_eq!(
			config.endpoint("diet-plans:search").expect("Colon path should resolve.").as_str(),
			"https://www.well-coach.ru/api/diet-plans:search"
		);
		assert_eq!(
			config.endpoint("mailto:coach@example.com").expect("Non-HTTP scheme should join.").as_str(),
			"https://www.well-coach.ru/api/mailto:coach@example.com"
		);
	}

	#[test]
	fn from_json_fills_defaults_and_validates() {
		let config = ClientConfig::from_json(
			r#"{"base_url":"http://localhost:8000/api","refresh_policy":"serialized"}"#,
		)
		.expect("Partial JSON config should parse.");

		assert_eq!(config.base_url.as_str(), "http://localhost:8000/api/");
		assert_eq!(config.refresh_policy, RefreshPolicy::Serialized);
		assert_eq!(config.auth_scheme, DEFAULT_AUTH_SCHEME);

		let err = ClientConfig::from_json(r#"{"base_url":"mailto:coach@example.com"}"#)
			.expect_err("Non-HTTP base URL must be rejected.");

		assert!(
			matches!(&err, ConfigError::Parse(inner) if inner.to_string().contains("is invalid")),
			"{err:?}"
		);
	}
}
