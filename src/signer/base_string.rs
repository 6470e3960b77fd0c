//! Signature base string construction (RFC 5849 §3.4.1).

// self
use crate::{
	_prelude::*,
	request::HttpMethod,
	signer::encode::{base_string_uri, percent_encode},
};

/// Collects the request elements that feed into a signature.
///
/// Query parameters of the URL are picked up on construction; form-body and protocol
/// parameters are appended by the caller. `realm` and `oauth_signature` must not be added.
#[derive(Clone, Debug)]
pub struct SignatureBaseString {
	method: HttpMethod,
	uri: String,
	params: Vec<(String, String)>,
}
impl SignatureBaseString {
	/// Starts a base string for `method` and `url`, seeding the parameter list with the URL
	/// query.
	pub fn new(method: HttpMethod, url: &Url) -> Self {
		let params = url.query_pairs().into_owned().collect();

		Self { method, uri: base_string_uri(url), params }
	}

	/// Adds a single parameter.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((name.into(), value.into()));

		self
	}

	/// Adds a batch of parameters.
	pub fn params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.params.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Normalized parameter string: every name and value encoded, sorted by name then value,
	/// joined as `name=value` with `&`.
	pub fn normalized_parameters(&self) -> String {
		let mut encoded = self
			.params
			.iter()
			.map(|(name, value)| (percent_encode(name), percent_encode(value)))
			.collect::<Vec<_>>();

		encoded.sort();

		encoded
			.iter()
			.map(|(name, value)| format!("{name}={value}"))
			.collect::<Vec<_>>()
			.join("&")
	}

	/// Base string URI (scheme, authority, and path).
	pub fn uri(&self) -> &str {
		&self.uri
	}
}
impl Display for SignatureBaseString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{}&{}&{}",
			self.method.as_str(),
			percent_encode(&self.uri),
			percent_encode(&self.normalized_parameters())
		)
	}
}
