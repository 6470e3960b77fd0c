//! Crate-level error types shared across the signer, flows, providers, and stores.

// self
use crate::{
	_prelude::*,
	auth::{CredentialError, IdentifierError},
	provider::ProviderDescriptorError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential validation or token-kind mismatch.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The authorization redirect is incomplete.
	#[error(transparent)]
	Callback(#[from] crate::flows::CallbackError),

	/// The provider does not accept the consumer key or its signature.
	#[error("Provider rejected the consumer credentials: {reason}.")]
	InvalidConsumer {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// The token is unknown, expired, or revoked; the credential must be re-authorized.
	#[error("Provider rejected the token: {reason}.")]
	TokenRejected {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Any other non-success response.
	#[error("Provider rejected the request with HTTP {status}: {reason}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Provider-supplied reason string.
		reason: String,
	},
	/// The request-token response did not carry `oauth_callback_confirmed=true`.
	#[error("Request-token response did not confirm the callback.")]
	CallbackNotConfirmed,
}
impl Error {
	/// Returns true for failures worth retrying with backoff.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transient(_) | Self::Transport(_))
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The signed `Authorization` header is not a valid header value.
	#[error("Authorization header value is invalid.")]
	InvalidHeader(#[from] http::header::InvalidHeaderValue),
	/// A URL cannot be parsed.
	#[error("URL is invalid.")]
	InvalidUrl(#[from] url::ParseError),
	/// Provider description failed validation.
	#[error("Provider description is invalid.")]
	InvalidDescriptor(#[from] ProviderDescriptorError),
	/// Identifier failed validation.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] IdentifierError),
	/// The signing key cannot initialize the HMAC.
	#[error("Signing key cannot be used with the selected signature method.")]
	InvalidSigningKey,
	/// Signature method identifier is unknown.
	#[error("Unsupported signature method `{method}`.")]
	UnsupportedSignatureMethod {
		/// Identifier that was supplied.
		method: String,
	},
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	ReadConfig {
		/// File path.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid JSON for [`ClientConfig`](crate::config::ClientConfig).
	#[error("Failed to parse configuration file {path}.")]
	ParseConfig {
		/// File path.
		path: String,
		/// Structured parsing failure, including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Required environment variable is missing.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// Only one of the access token and its secret was supplied.
	#[error("The access token and access token secret must be provided together.")]
	IncompleteAccessToken,
	/// The operation needs a credential store but none is attached.
	#[error("No credential store is attached to the client.")]
	StoreNotAttached,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned a failure that should clear up on its own.
	#[error("Endpoint returned a temporary failure: {message}.")]
	Endpoint {
		/// Provider- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint answered 2xx with a body that is not a usable token response.
	#[error("Token endpoint returned a malformed response: {message}.")]
	MalformedResponse {
		/// What was wrong with the body.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
