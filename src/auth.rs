//! Credential models: redacted secrets, the stored access/refresh pair, and wire payloads of the
//! JWT endpoints.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;
