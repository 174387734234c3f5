//! Access/refresh pair plus the request and response bodies of `auth/jwt/*`.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// The single access/refresh pair a client holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived bearer credential.
	pub access: TokenSecret,
	/// Long-lived credential exchanged for new access tokens.
	pub refresh: TokenSecret,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access: access.into(), refresh: refresh.into() }
	}
}

/// Email/password body accepted by `auth/jwt/create`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginCredentials {
	/// Account email, the backend's login field.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
}
impl LoginCredentials {
	/// Creates a login body.
	pub fn new(email: impl Into<String>, password: impl Into<TokenSecret>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}

/// Body sent to `auth/jwt/refresh`. A missing refresh token is sent as `null`.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest<'a> {
	/// Stored refresh token.
	pub refresh: Option<&'a str>,
}

/// Payload returned by a successful `auth/jwt/refresh`.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// Newly issued access token.
	pub access: TokenSecret,
}

/// Body sent to `auth/jwt/verify`.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyRequest<'a> {
	/// Token to verify.
	pub token: &'a str,
}
