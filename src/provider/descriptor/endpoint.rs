// self
use crate::{_prelude::*, request::HttpMethod};

/// Endpoint URL plus the HTTP method the provider expects on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthEndPoint {
	/// Endpoint URL.
	pub url: Url,
	/// HTTP method used to call the endpoint.
	#[serde(default)]
	pub method: HttpMethod,
}
impl OAuthEndPoint {
	/// Creates an endpoint.
	pub fn new(url: Url, method: HttpMethod) -> Self {
		Self { url, method }
	}

	/// Shorthand for a `GET` endpoint.
	pub fn get(url: Url) -> Self {
		Self::new(url, HttpMethod::Get)
	}

	/// Shorthand for a `POST` endpoint.
	pub fn post(url: Url) -> Self {
		Self::new(url, HttpMethod::Post)
	}
}

/// OAuth protocol revision spoken by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
	/// OAuth Core 1.0; the callback travels with the authorization redirect.
	#[serde(rename = "1.0")]
	V1_0,
	/// OAuth Core 1.0a / RFC 5849; the callback is signed into the request-token call and the
	/// verifier is required for the access-token exchange.
	#[default]
	#[serde(rename = "1.0a")]
	V1_0a,
}
impl ProtocolVersion {
	/// Returns true when `oauth_callback` and `oauth_verifier` travel as signed parameters.
	pub fn signs_callback(self) -> bool {
		matches!(self, ProtocolVersion::V1_0a)
	}
}

/// OAuth flows that reach the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthFlow {
	/// Temporary credential request.
	RequestToken,
	/// Token credential exchange.
	AccessToken,
	/// Authenticated API call.
	Resource,
}
impl OAuthFlow {
	/// Returns a stable label.
	pub fn as_str(self) -> &'static str {
		match self {
			OAuthFlow::RequestToken => "request_token",
			OAuthFlow::AccessToken => "access_token",
			OAuthFlow::Resource => "resource",
		}
	}
}
impl Display for OAuthFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
