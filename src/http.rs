//! Transport primitives for API calls.
//!
//! [`ApiRequest`] is the caller-facing request descriptor: a path (or absolute URL), a method,
//! an optional JSON body, and extra headers. The session layer resolves it against the
//! configured base URL into a [`PreparedRequest`], injects credentials, and hands it to an
//! [`ApiTransport`]. Transports only move bytes; status interpretation happens above them, so a
//! transport returns `Ok` for every response it manages to read, whatever its status.

// std
use std::ops::Deref;
// crates.io
use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, DecodeError, TransportError},
};

/// Boxed future returned by [`ApiTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute a [`PreparedRequest`].
///
/// This is the client's only dependency on an HTTP implementation. Implementations must be
/// `Send + Sync + 'static` so one transport can back every clone of a client, and the returned
/// future must be `Send` so callers can spawn wrapped requests on multi-threaded executors.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request`, resolving once the full response body has been read.
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_>;
}

/// Outbound call description, opaque to the session layer except for header injection.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Path relative to the base URL, or an absolute `http(s)` URL.
	pub target: String,
	/// HTTP method; `GET` unless set.
	pub method: Method,
	/// JSON body, if any.
	pub body: Option<JsonValue>,
	/// Extra headers sent with the request.
	pub headers: HeaderMap,
}
impl ApiRequest {
	/// Creates a request with the given method.
	pub fn new(method: Method, target: impl Into<String>) -> Self {
		Self { target: target.into(), method, body: None, headers: HeaderMap::new() }
	}

	/// Shorthand for a `GET` request.
	pub fn get(target: impl Into<String>) -> Self {
		Self::new(Method::GET, target)
	}

	/// Shorthand for a `POST` request.
	pub fn post(target: impl Into<String>) -> Self {
		Self::new(Method::POST, target)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(target: impl Into<String>) -> Self {
		Self::new(Method::PATCH, target)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(target: impl Into<String>) -> Self {
		Self::new(Method::DELETE, target)
	}

	/// Attaches a JSON body.
	pub fn with_body(mut self, body: JsonValue) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes `body` and attaches it.
	pub fn with_json<T>(self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		Ok(self.with_body(serde_json::to_value(body)?))
	}

	/// Adds a header, validating name and value.
	pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let name_parsed = HeaderName::try_from(name).map_err(|_| invalid())?;
		let value_parsed = HeaderValue::try_from(value).map_err(|_| invalid())?;

		self.headers.insert(name_parsed, value_parsed);

		Ok(self)
	}

	/// Resolves the target against `config` and serializes the body.
	///
	/// A caller-supplied `Authorization` header is dropped; credentials only come from the store.
	pub fn prepare(&self, config: &ClientConfig) -> Result<PreparedRequest, ConfigError> {
		let url = config.endpoint(&self.target)?;
		let mut headers = self.headers.clone();

		headers.remove(AUTHORIZATION);

		let body = match &self.body {
			Some(value) => {
				headers
					.entry(CONTENT_TYPE)
					.or_insert(HeaderValue::from_static("application/json"));

				Some(serde_json::to_vec(value)?)
			},
			None => None,
		};

		Ok(PreparedRequest { method: self.method.clone(), url, headers, body })
	}
}
impl From<&str> for ApiRequest {
	fn from(target: &str) -> Self {
		Self::get(target)
	}
}
impl From<String> for ApiRequest {
	fn from(target: String) -> Self {
		Self::get(target)
	}
}

/// Fully resolved request handed to an [`ApiTransport`].
#[derive(Clone, Debug)]
pub struct PreparedRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Headers, including any injected credential.
	pub headers: HeaderMap,
	/// Serialized body.
	pub body: Option<Vec<u8>>,
}
impl PreparedRequest {
	/// Sets the `Authorization` header to `value`.
	pub fn authorize(&mut self, value: &str) -> Result<(), ConfigError> {
		let mut header = HeaderValue::try_from(value)
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.to_string() })?;

		header.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, header);

		Ok(())
	}

	/// Returns the body decoded as JSON, mainly for transports and test doubles.
	pub fn json_body(&self) -> Option<JsonValue> {
		self.body.as_deref().and_then(|bytes| serde_json::from_slice(bytes).ok())
	}
}

/// Response read back from a transport.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response without headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Creates a response carrying `value` as its JSON body.
	pub fn json_response(status: StatusCode, value: &JsonValue) -> Self {
		let mut response = Self::new(status, value.to_string());

		response.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		response
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Decodes the body as `T`, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source, status: self.status.as_u16() })
	}

	/// Body as JSON without failing: `null` when empty, a JSON string when not JSON.
	pub fn json_value(&self) -> JsonValue {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return JsonValue::Null;
		}

		serde_json::from_slice(&self.body)
			.unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(&self.body).into_owned()))
	}

	/// Converts a non-2xx response into [`Error::Api`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(Error::Api { status: self.status.as_u16(), body: self.json_value() })
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport with reqwest defaults, surfacing builder failures.
	pub fn try_new() -> Result<Self, ConfigError> {
		ReqwestClient::builder().build().map(Self).map_err(ConfigError::http_client_build)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let PreparedRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(bytes) = body {
				builder = builder.body(bytes);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn prepare_resolves_target_and_sets_content_type() {
		let config = ClientConfig::default();
		let request = ApiRequest::post("/diet-plans/")
			.with_body(json!({ "name": "cut" }))
			.with_header("Authorization", "JWT forged")
			.expect("Header should be valid.")
			.prepare(&config)
			.expect("Request should prepare.");

		assert_eq!(request.url.as_str(), "https://www.well-coach.ru/api/diet-plans/");
		assert_eq!(request.method, Method::POST);
		assert!(request.headers.get(AUTHORIZATION).is_none());
		assert_eq!(
			request.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some("application/json")
		);
		assert_eq!(request.json_body(), Some(json!({ "name": "cut" })));
	}

	#[test]
	fn string_targets_become_get_requests() {
		let request = ApiRequest::from("users/me/");

		assert_eq!(request.method, Method::GET);
		assert!(request.body.is_none());
	}

	#[test]
	fn invalid_headers_are_rejected() {
		assert!(matches!(
			ApiRequest::get("x").with_header("bad header", "v"),
			Err(ConfigError::InvalidHeader { .. })
		));
	}

	#[test]
	fn response_body_is_lenient_for_errors_and_strict_for_decoding() {
		let empty = ApiResponse::new(StatusCode::BAD_GATEWAY, Vec::new());
		let text = ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error (500)");

		assert_eq!(empty.json_value(), JsonValue::Null);
		assert_eq!(text.json_value(), json!("Server Error (500)"));
		assert!(matches!(
			text.clone().error_for_status(),
			Err(Error::Api { status: 500, .. })
		));

		let err = ApiResponse::json_response(StatusCode::OK, &json!({ "access": 5 }))
			.json::<crate::auth::RefreshResponse>()
			.expect_err("Numeric access token must not decode.");

		assert!(err.to_string().contains("200"));

		let DecodeError::Json { source, .. } = err;

		assert_eq!(source.path().to_string(), "access");
	}
}
