//! Credential models: consumer keys, temporary/token credentials, access grants, and
//! redacted secrets.

pub mod credential;
pub mod grant;
pub mod id;
pub mod secret;

pub use credential::*;
pub use grant::*;
pub use id::*;
pub use secret::*;
