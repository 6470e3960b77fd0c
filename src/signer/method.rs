//! Signature methods (RFC 5849 §3.4.2 – §3.4.4).

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Signature method advertised through `oauth_signature_method`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// HMAC-SHA1, the method Twitter accepts.
	#[default]
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// HMAC-SHA256.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
	/// Signing key sent verbatim; only safe over TLS.
	#[serde(rename = "PLAINTEXT")]
	Plaintext,
}
impl SignatureMethod {
	/// Returns the protocol identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
			SignatureMethod::Plaintext => "PLAINTEXT",
		}
	}

	/// Computes `oauth_signature` for a base string with the given signing key.
	pub fn sign(self, key: &Secret, base_string: &str) -> Result<String, ConfigError> {
		let key = key.expose().as_bytes();

		match self {
			SignatureMethod::HmacSha1 => {
				let mut mac = Hmac::<Sha1>::new_from_slice(key)
					.map_err(|_| ConfigError::InvalidSigningKey)?;

				mac.update(base_string.as_bytes());

				Ok(STANDARD.encode(mac.finalize().into_bytes()))
			},
			SignatureMethod::HmacSha256 => {
				let mut mac = Hmac::<Sha256>::new_from_slice(key)
					.map_err(|_| ConfigError::InvalidSigningKey)?;

				mac.update(base_string.as_bytes());

				Ok(STANDARD.encode(mac.finalize().into_bytes()))
			},
			SignatureMethod::Plaintext => Ok(String::from_utf8_lossy(key).into_owned()),
		}
	}

	/// Checks `signature` against the one computed for `base_string` in constant time.
	pub fn verify(
		self,
		key: &Secret,
		base_string: &str,
		signature: &str,
	) -> Result<bool, ConfigError> {
		let key_bytes = key.expose().as_bytes();

		match self {
			SignatureMethod::HmacSha1 => {
				let Ok(raw) = STANDARD.decode(signature) else {
					return Ok(false);
				};
				let mut mac = Hmac::<Sha1>::new_from_slice(key_bytes)
					.map_err(|_| ConfigError::InvalidSigningKey)?;

				mac.update(base_string.as_bytes());

				Ok(mac.verify_slice(&raw).is_ok())
			},
			SignatureMethod::HmacSha256 => {
				let Ok(raw) = STANDARD.decode(signature) else {
					return Ok(false);
				};
				let mut mac = Hmac::<Sha256>::new_from_slice(key_bytes)
					.map_err(|_| ConfigError::InvalidSigningKey)?;

				mac.update(base_string.as_bytes());

				Ok(mac.verify_slice(&raw).is_ok())
			},
			SignatureMethod::Plaintext => Ok(constant_time_eq(key_bytes, signature.as_bytes())),
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
			"HMAC-SHA256" => Ok(SignatureMethod::HmacSha256),
			"PLAINTEXT" => Ok(SignatureMethod::Plaintext),
			other => Err(ConfigError::UnsupportedSignatureMethod { method: other.to_owned() }),
		}
	}
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	a.len() == b.len() && a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
