//! Service provider description shared by all flows.
//!
//! The module exposes validated endpoint metadata, supporting builder utilities, and
//! provider quirks so flows can stay transport-agnostic.

/// Builder API for assembling provider descriptions.
pub mod builder;
/// Endpoint, protocol version, and flow labels.
pub mod endpoint;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use endpoint::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId, signer::SignatureMethod};

/// Immutable description of an OAuth 1.0a service provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProviderDescription {
	/// Description identifier.
	pub id: ProviderId,
	/// Temporary credential request endpoint.
	pub request_token: OAuthEndPoint,
	/// Resource owner authorization endpoint.
	pub authorize: OAuthEndPoint,
	/// Optional "sign in with" endpoint that skips the prompt for returning users.
	pub authenticate: Option<OAuthEndPoint>,
	/// Token credential request endpoint.
	pub access_token: OAuthEndPoint,
	/// Protocol revision.
	pub version: ProtocolVersion,
	/// Signature method used for every request.
	pub signature_method: SignatureMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ServiceProviderDescription {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ServiceProviderDescriptionBuilder {
		ServiceProviderDescriptionBuilder::new(id)
	}

	/// Endpoint used by `flow`; resource calls have no fixed endpoint.
	pub fn endpoint(&self, flow: OAuthFlow) -> Option<&OAuthEndPoint> {
		match flow {
			OAuthFlow::RequestToken => Some(&self.request_token),
			OAuthFlow::AccessToken => Some(&self.access_token),
			OAuthFlow::Resource => None,
		}
	}
}
