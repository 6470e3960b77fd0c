//! Provider-facing descriptions (data) and strategies (behavior).
//!
//! `descriptor` exposes validated metadata ([`ServiceProviderDescription`]) covering
//! HTTPS-only endpoints and their methods, the protocol revision, the signature method, and
//! provider quirks (realm, `oauth_version`, callback confirmation, default callback).
//! `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used by flows to
//! augment protocol parameters and map failed responses into the crate's error taxonomy.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;
pub use crate::request::HttpMethod;
