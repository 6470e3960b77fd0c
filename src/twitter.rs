//! Twitter service provider preset and REST API URL helpers.
//!
//! [`ServiceProviderDescription::twitter`] describes `api.twitter.com`'s OAuth 1.0a endpoints
//! (HMAC-SHA1, `oauth_version=1.0`, callback confirmation required). [`TwitterStrategy`] wraps
//! [`DefaultProviderStrategy`] and can request a narrower access level with
//! `x_auth_access_type`.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::ConfigError,
	provider::{
		DefaultProviderStrategy, OAuthEndPoint, OAuthFlow, ProviderErrorContext, ProviderErrorKind,
		ProviderStrategy, ServiceProviderDescription,
	},
	signer::SignatureMethod,
};

/// REST API v1.1 base.
pub const API_BASE: &str = "https://api.twitter.com/1.1/";
/// Media upload base.
pub const UPLOAD_BASE: &str = "https://upload.twitter.com/1.1/";
/// OAuth endpoints base.
pub const OAUTH_BASE: &str = "https://api.twitter.com/oauth/";

impl ServiceProviderDescription {
	/// Description of Twitter's OAuth 1.0a endpoints.
	pub fn twitter() -> Result<Self, ConfigError> {
		let oauth = Url::parse(OAUTH_BASE)?;
		let description = Self::builder(ProviderId::new("twitter")?)
			.request_token_endpoint(OAuthEndPoint::post(oauth.join("request_token")?))
			.authorize_endpoint(oauth.join("authorize")?)
			.authenticate_endpoint(oauth.join("authenticate")?)
			.access_token_endpoint(OAuthEndPoint::post(oauth.join("access_token")?))
			.signature_method(SignatureMethod::HmacSha1)
			.build()?;

		Ok(description)
	}
}

/// Resolves a REST API path such as `statuses/update.json`.
pub fn api_url(path: &str) -> Result<Url, ConfigError> {
	Ok(Url::parse(API_BASE)?.join(path.trim_start_matches('/'))?)
}

/// Resolves a media upload path such as `media/upload.json`.
pub fn upload_url(path: &str) -> Result<Url, ConfigError> {
	Ok(Url::parse(UPLOAD_BASE)?.join(path.trim_start_matches('/'))?)
}

/// Access level requested through `x_auth_access_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
	/// Read-only access.
	Read,
	/// Read and write access.
	Write,
}
impl AccessType {
	/// Wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			AccessType::Read => "read",
			AccessType::Write => "write",
		}
	}
}

/// Twitter strategy: default classification plus an optional `x_auth_access_type`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwitterStrategy {
	/// Access level requested on the request-token call; the app's setting when unset.
	pub access_type: Option<AccessType>,
}
impl TwitterStrategy {
	/// Requests `access_type` instead of the app's configured access level.
	pub fn with_access_type(access_type: AccessType) -> Self {
		Self { access_type: Some(access_type) }
	}
}
impl ProviderStrategy for TwitterStrategy {
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		DefaultProviderStrategy.classify_error(ctx)
	}

	fn augment_protocol_params(&self, flow: OAuthFlow, params: &mut BTreeMap<String, String>) {
		if let (OAuthFlow::RequestToken, Some(access_type)) = (flow, self.access_type) {
			params.insert("x_auth_access_type".into(), access_type.as_str().into());
		}
	}
}
