//! Standardized API error envelopes and the token-invalid sentinel check.
//!
//! The backend renders every client or server error as
//! `{ "type": "...", "errors": [{ "code": "...", "detail": "...", "attr": ... }] }`.
//! Only the first entry's `code` drives client behavior; everything else is carried for callers.
//! Inspection never fails: any body that does not match the shape is simply "not an envelope".

// self
use crate::_prelude::*;

/// Error code the backend uses when the presented access token is expired or malformed.
pub const TOKEN_NOT_VALID: &str = "token_not_valid";

/// Structured error response returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
	/// Error category (`client_error`, `server_error`, `validation_error`), when present.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Individual error entries, in backend order.
	pub errors: Vec<ErrorEntry>,
}
impl ErrorEnvelope {
	/// Parses `body` as an envelope, returning `None` on any shape mismatch.
	pub fn from_body(body: &JsonValue) -> Option<Self> {
		Self::deserialize(body).ok()
	}

	/// Code of the first entry, if any.
	pub fn first_code(&self) -> Option<&str> {
		self.errors.first().map(|entry| entry.code.as_str())
	}
}

/// One entry of an [`ErrorEnvelope`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
	/// Machine-readable error code.
	pub code: String,
	/// Human-readable description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	/// Offending field for validation errors.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attr: Option<String>,
}

/// Returns `true` when `body.errors[0].code == sentinel`.
///
/// Walks the JSON directly so that unrelated shape problems in later entries (or extra fields)
/// cannot turn a real token error into a miss.
pub fn first_code_matches(body: &JsonValue, sentinel: &str) -> bool {
	body.get("errors")
		.and_then(JsonValue::as_array)
		.and_then(|errors| errors.first())
		.and_then(|entry| entry.get("code"))
		.and_then(JsonValue::as_str)
		.is_some_and(|code| code == sentinel)
}
