// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{OAuthEndPoint, ProtocolVersion, ProviderQuirks, ServiceProviderDescription},
	request::HttpMethod,
	signer::SignatureMethod,
};

/// Errors raised while constructing or validating provider descriptions.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Request-token endpoint is mandatory.
	#[error("Missing request-token endpoint.")]
	MissingRequestTokenEndpoint,
	/// Authorization endpoint is mandatory.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizeEndpoint,
	/// Access-token endpoint is mandatory.
	#[error("Missing access-token endpoint.")]
	MissingAccessTokenEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint declared with a method it cannot be called with.
	#[error("The {endpoint} endpoint cannot be called with {method}.")]
	UnsupportedMethod {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Declared method.
		method: HttpMethod,
	},
	/// Default callback must not be empty.
	#[error("The default callback must not be empty.")]
	EmptyDefaultCallback,
}

/// Builder for [`ServiceProviderDescription`] values.
#[derive(Debug)]
pub struct ServiceProviderDescriptionBuilder {
	/// Identifier for the description being constructed.
	pub id: ProviderId,
	/// Temporary credential request endpoint.
	pub request_token: Option<OAuthEndPoint>,
	/// Resource owner authorization endpoint.
	pub authorize: Option<OAuthEndPoint>,
	/// Optional authenticate endpoint.
	pub authenticate: Option<OAuthEndPoint>,
	/// Token credential request endpoint.
	pub access_token: Option<OAuthEndPoint>,
	/// Protocol revision.
	pub version: ProtocolVersion,
	/// Signature method.
	pub signature_method: SignatureMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ServiceProviderDescriptionBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			request_token: None,
			authorize: None,
			authenticate: None,
			access_token: None,
			version: ProtocolVersion::default(),
			signature_method: SignatureMethod::default(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, endpoint: OAuthEndPoint) -> Self {
		self.request_token = Some(endpoint);

		self
	}

	/// Sets the authorization endpoint; it is always called with `GET`.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize = Some(OAuthEndPoint::get(url));

		self
	}

	/// Sets the optional authenticate endpoint; it is always called with `GET`.
	pub fn authenticate_endpoint(mut self, url: Url) -> Self {
		self.authenticate = Some(OAuthEndPoint::get(url));

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, endpoint: OAuthEndPoint) -> Self {
		self.access_token = Some(endpoint);

		self
	}

	/// Overrides the protocol revision.
	pub fn version(mut self, version: ProtocolVersion) -> Self {
		self.version = version;

		self
	}

	/// Overrides the signature method.
	pub fn signature_method(mut self, method: SignatureMethod) -> Self {
		self.signature_method = method;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting description.
	pub fn build(self) -> Result<ServiceProviderDescription, ProviderDescriptorError> {
		let request_token =
			self.request_token.ok_or(ProviderDescriptorError::MissingRequestTokenEndpoint)?;
		let authorize = self.authorize.ok_or(ProviderDescriptorError::MissingAuthorizeEndpoint)?;
		let access_token =
			self.access_token.ok_or(ProviderDescriptorError::MissingAccessTokenEndpoint)?;
		let description = ServiceProviderDescription {
			id: self.id,
			request_token,
			authorize,
			authenticate: self.authenticate,
			access_token,
			version: self.version,
			signature_method: self.signature_method,
			quirks: self.quirks,
		};

		description.validate()?;

		Ok(description)
	}
}

impl ServiceProviderDescription {
	/// Validates invariants for the description.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		const EXCHANGE: &[HttpMethod] = &[HttpMethod::Get, HttpMethod::Post];

		validate_endpoint("request-token", &self.request_token, EXCHANGE)?;
		validate_endpoint("authorization", &self.authorize, &[HttpMethod::Get])?;

		if let Some(authenticate) = self.authenticate.as_ref() {
			validate_endpoint("authenticate", authenticate, &[HttpMethod::Get])?;
		}

		validate_endpoint("access-token", &self.access_token, EXCHANGE)?;

		if self.quirks.default_callback.trim().is_empty() {
			return Err(ProviderDescriptorError::EmptyDefaultCallback);
		}

		Ok(())
	}
}

fn validate_endpoint(
	name: &'static str,
	endpoint: &OAuthEndPoint,
	allowed: &[HttpMethod],
) -> Result<(), ProviderDescriptorError> {
	if endpoint.url.scheme() != "https" {
		return Err(ProviderDescriptorError::InsecureEndpoint {
			endpoint: name,
			url: endpoint.url.to_string(),
		});
	}
	if !allowed.contains(&endpoint.method) {
		return Err(ProviderDescriptorError::UnsupportedMethod {
			endpoint: name,
			method: endpoint.method,
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	fn builder() -> ServiceProviderDescriptionBuilder {
		ServiceProviderDescription::builder(
			ProviderId::new("photos").expect("Provider fixture should be valid."),
		)
		.request_token_endpoint(OAuthEndPoint::post(url("https://photos.example.net/initiate")))
		.authorize_endpoint(url("https://photos.example.net/authorize"))
		.access_token_endpoint(OAuthEndPoint::post(url("https://photos.example.net/token")))
	}

	#[test]
	fn builds_with_defaults() {
		let description = builder().build().expect("Description should build.");

		assert_eq!(description.version, ProtocolVersion::V1_0a);
		assert_eq!(description.signature_method, SignatureMethod::HmacSha1);
		assert_eq!(description.quirks.default_callback, "oob");
		assert!(description.authenticate.is_none());
	}

	#[test]
	fn missing_endpoints_are_reported() {
		let result = ServiceProviderDescription::builder(
			ProviderId::new("photos").expect("Provider fixture should be valid."),
		)
		.authorize_endpoint(url("https://photos.example.net/authorize"))
		.build();

		assert_eq!(result, Err(ProviderDescriptorError::MissingRequestTokenEndpoint));
	}

	#[test]
	fn insecure_and_mismatched_endpoints_are_rejected() {
		let insecure = builder()
			.access_token_endpoint(OAuthEndPoint::post(url("http://photos.example.net/token")))
			.build();

		assert!(matches!(
			insecure,
			Err(ProviderDescriptorError::InsecureEndpoint { endpoint: "access-token", .. })
		));

		let deleting = builder()
			.request_token_endpoint(OAuthEndPoint::new(
				url("https://photos.example.net/initiate"),
				HttpMethod::Delete,
			))
			.build();

		assert_eq!(
			deleting,
			Err(ProviderDescriptorError::UnsupportedMethod {
				endpoint: "request-token",
				method: HttpMethod::Delete,
			})
		);
	}

	#[test]
	fn empty_default_callback_is_rejected() {
		let quirks = ProviderQuirks { default_callback: " ".into(), ..ProviderQuirks::default() };

		assert_eq!(
			builder().quirks(quirks).build(),
			Err(ProviderDescriptorError::EmptyDefaultCallback)
		);
	}
}
