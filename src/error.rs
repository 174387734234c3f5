//! Client-level error types shared across the transport, session, and store layers.

// self
use crate::{_prelude::*, envelope::ErrorEnvelope};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the requested type.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Backend answered with a non-success status.
	#[error("API responded with status {status}.")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Response body parsed as JSON, a JSON string for non-JSON bodies, or `null` when empty.
		body: JsonValue,
	},
}
impl Error {
	/// Returns the HTTP status carried by an [`Error::Api`].
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Interprets the body of an [`Error::Api`] as a standardized error envelope.
	///
	/// Returns `None` for every other variant and for bodies that do not match the envelope shape.
	pub fn envelope(&self) -> Option<ErrorEnvelope> {
		match self {
			Self::Api { body, .. } => ErrorEnvelope::from_body(body),
			_ => None,
		}
	}

	/// Returns `true` when the first envelope entry carries `sentinel` as its code.
	pub fn has_error_code(&self, sentinel: &str) -> bool {
		match self {
			Self::Api { body, .. } => crate::envelope::first_code_matches(body, sentinel),
			_ => false,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or cannot serve as a base.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		value: String,
		/// Underlying parsing failure, when the input did not parse at all.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Endpoint `{path}` cannot be resolved against the base URL.")]
	InvalidEndpoint {
		/// Rejected path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
	},
	/// A required configuration value is empty.
	#[error("Configuration value `{field}` must not be empty.")]
	Empty {
		/// Field label.
		field: &'static str,
	},
	/// Configuration document could not be parsed or failed validation.
	#[error("Configuration could not be parsed.")]
	Parse(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested type.
	#[error("Response body from status {status} could not be decoded.")]
	Json {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
}
