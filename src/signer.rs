//! OAuth 1.0a request signing (RFC 5849).
//!
//! [`Signer`] turns a [`ResourceRequest`] plus credentials into a [`SignedRequest`]:
//!
//! 1. collect the protocol parameters (`oauth_consumer_key`, `oauth_token`, `oauth_nonce`,
//!    `oauth_timestamp`, `oauth_signature_method`, `oauth_version`, and the flow-specific
//!    `oauth_callback` / `oauth_verifier`);
//! 2. build the [`SignatureBaseString`] from the method, the normalized URI, the query, any
//!    form body, and the protocol parameters;
//! 3. sign it with the [`SignatureMethod`] using `enc(consumer_secret)&enc(token_secret)`;
//! 4. render the [`AuthorizationHeader`] and attach it to a [`PreparedRequest`].

pub mod base_string;
pub mod encode;
pub mod header;
pub mod method;

pub use base_string::*;
pub use header::*;
pub use method::*;

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredential, TokenPair, credential},
	provider::ServiceProviderDescription,
	request::{PreparedRequest, ResourceRequest},
};

const NONCE_LEN: usize = 32;
const OAUTH_VERSION: &str = "1.0";

/// Supplies `oauth_nonce` and `oauth_timestamp` values.
pub trait NonceSource
where
	Self: Send + Sync,
{
	/// Returns a fresh nonce.
	fn nonce(&self) -> String;

	/// Returns the current Unix timestamp in seconds.
	fn timestamp(&self) -> i64;
}

/// Random 32-character alphanumeric nonces and the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNonce;
impl NonceSource for RandomNonce {
	fn nonce(&self) -> String {
		rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
	}

	fn timestamp(&self) -> i64 {
		OffsetDateTime::now_utc().unix_timestamp()
	}
}

/// Fixed nonce and timestamp, for reproducible signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedNonce {
	/// Nonce returned on every call.
	pub nonce: String,
	/// Timestamp returned on every call.
	pub timestamp: i64,
}
impl FixedNonce {
	/// Creates a fixed source.
	pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
		Self { nonce: nonce.into(), timestamp }
	}
}
impl NonceSource for FixedNonce {
	fn nonce(&self) -> String {
		self.nonce.clone()
	}

	fn timestamp(&self) -> i64 {
		self.timestamp
	}
}

/// Flow-specific protocol parameters layered over the common set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolExtras {
	/// `oauth_callback` for the request-token flow.
	pub callback: Option<String>,
	/// `oauth_verifier` for the access-token flow.
	pub verifier: Option<String>,
	/// Additional provider-specific parameters (for example `x_auth_access_type`).
	pub extra: BTreeMap<String, String>,
}
impl ProtocolExtras {
	/// Sets `oauth_callback`.
	pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
		self.callback = Some(callback.into());

		self
	}

	/// Sets `oauth_verifier`.
	pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.verifier = Some(verifier.into());

		self
	}
}

/// Output of [`Signer::sign`].
#[derive(Clone, Debug)]
pub struct SignedRequest {
	/// Ready-to-send request carrying the `Authorization` header.
	pub prepared: PreparedRequest,
	/// Structured header.
	pub authorization: AuthorizationHeader,
	/// Base string that was signed.
	pub base_string: String,
}
impl SignedRequest {
	/// Rendered `Authorization` header value.
	pub fn authorization_header(&self) -> String {
		self.authorization.to_string()
	}
}

/// Signs requests for one signature method and provider configuration.
#[derive(Clone)]
pub struct Signer {
	method: SignatureMethod,
	realm: Option<String>,
	include_version: bool,
	nonce_source: Arc<dyn NonceSource>,
}
impl Signer {
	/// Creates a signer that sends `oauth_version=1.0`, no realm, and random nonces.
	pub fn new(method: SignatureMethod) -> Self {
		Self { method, realm: None, include_version: true, nonce_source: Arc::new(RandomNonce) }
	}

	/// Creates a signer configured from a provider description.
	pub fn for_provider(description: &ServiceProviderDescription) -> Self {
		Self {
			method: description.signature_method,
			realm: description.quirks.realm.clone(),
			include_version: description.quirks.include_version,
			nonce_source: Arc::new(RandomNonce),
		}
	}

	/// Overrides the realm placed in the header.
	pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
		self.realm = Some(realm.into());

		self
	}

	/// Toggles the optional `oauth_version` parameter.
	pub fn with_version_param(mut self, include: bool) -> Self {
		self.include_version = include;

		self
	}

	/// Replaces the nonce/timestamp source.
	pub fn with_nonce_source(mut self, source: Arc<dyn NonceSource>) -> Self {
		self.nonce_source = source;

		self
	}

	/// Signature method in use.
	pub fn method(&self) -> SignatureMethod {
		self.method
	}

	/// Protocol parameters for one request, without `oauth_signature`.
	pub fn protocol_params(
		&self,
		consumer: &ConsumerCredential,
		token: Option<&TokenPair>,
		extras: &ProtocolExtras,
	) -> BTreeMap<String, String> {
		let mut params = extras.extra.clone();

		params.insert("oauth_consumer_key".into(), consumer.key().to_owned());
		params.insert("oauth_nonce".into(), self.nonce_source.nonce());
		params.insert("oauth_signature_method".into(), self.method.as_str().into());
		params.insert("oauth_timestamp".into(), self.nonce_source.timestamp().to_string());

		if self.include_version {
			params.insert("oauth_version".into(), OAUTH_VERSION.into());
		}
		if let Some(pair) = token {
			params.insert("oauth_token".into(), pair.key().to_owned());
		}
		if let Some(callback) = &extras.callback {
			params.insert("oauth_callback".into(), callback.clone());
		}
		if let Some(verifier) = &extras.verifier {
			params.insert("oauth_verifier".into(), verifier.clone());
		}

		params
	}

	/// Signs `request` and returns it ready to send.
	pub fn sign(
		&self,
		consumer: &ConsumerCredential,
		token: Option<&TokenPair>,
		request: &ResourceRequest,
		extras: &ProtocolExtras,
	) -> Result<SignedRequest> {
		let mut params = self.protocol_params(consumer, token, extras);
		let base = SignatureBaseString::new(request.method, &request.url)
			.params(request.signature_params())
			.params(params.iter().map(|(name, value)| (name.as_str(), value.as_str())))
			.to_string();

		#[cfg(feature = "tracing")]
		tracing::trace!(base_string = %base, "computed signature base string");

		let key = credential::signing_key(consumer, token);
		let signature = self.method.sign(&key, &base)?;

		params.insert("oauth_signature".into(), signature);

		let authorization = AuthorizationHeader::new(self.realm.clone(), params);
		let prepared = request.prepare(&authorization)?;

		Ok(SignedRequest { prepared, authorization, base_string: base })
	}

	/// Recomputes the signature of a received request and compares it with the one in
	/// `header`.
	pub fn verify(
		&self,
		consumer: &ConsumerCredential,
		token: Option<&TokenPair>,
		request: &ResourceRequest,
		header: &AuthorizationHeader,
	) -> Result<bool> {
		let Some(expected) = header.signature() else {
			return Ok(false);
		};
		let base = SignatureBaseString::new(request.method, &request.url)
			.params(request.signature_params())
			.params(header.signed_params())
			.to_string();
		let key = credential::signing_key(consumer, token);

		Ok(self.method.verify(&key, &base, expected)?)
	}
}
impl Debug for Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Signer")
			.field("method", &self.method)
			.field("realm", &self.realm)
			.field("include_version", &self.include_version)
			.finish()
	}
}
impl Default for Signer {
	fn default() -> Self {
		Self::new(SignatureMethod::default())
	}
}
