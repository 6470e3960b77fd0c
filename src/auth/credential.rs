//! Consumer credentials, token pairs, and the token-kind lifecycle.
//!
//! A [`TokenCredential`] starts out [`TokenKind::Invalid`], moves to
//! [`TokenKind::Request`] once temporary credentials are issued, and to
//! [`TokenKind::Access`] after the verifier exchange. Any state can fall back to
//! `Invalid` when the provider rejects the token.

// self
use crate::{_prelude::*, auth::Secret, signer::encode};

/// Validation and lifecycle failures for credentials.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// A key or secret was empty.
	#[error("The {field} must not be empty.")]
	Empty {
		/// Which value was empty.
		field: &'static str,
	},
	/// The operation needs a different token kind than the one currently held.
	#[error("Expected a {expected} token but the credential holds a {actual} token.")]
	UnexpectedTokenKind {
		/// Token kind required by the operation.
		expected: TokenKind,
		/// Token kind currently held.
		actual: TokenKind,
	},
	/// The authorization callback refers to a different request token than the one held.
	#[error("The callback token does not match the held request token.")]
	TokenMismatch,
}

/// Kind of token currently held by a [`TokenCredential`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Temporary credentials returned by the request-token endpoint.
	Request,
	/// Token credentials returned by the access-token endpoint.
	Access,
	/// No usable token.
	Invalid,
}
impl TokenKind {
	/// Returns a stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Request => "request",
			TokenKind::Access => "access",
			TokenKind::Invalid => "invalid",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Application (consumer) key and secret issued by the service provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCredential {
	key: String,
	secret: Secret,
}
impl ConsumerCredential {
	/// Creates a consumer credential, rejecting empty values.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, CredentialError> {
		let key = key.into();
		let secret = secret.into();

		if key.is_empty() {
			return Err(CredentialError::Empty { field: "consumer key" });
		}
		if secret.is_empty() {
			return Err(CredentialError::Empty { field: "consumer secret" });
		}

		Ok(Self { key, secret: Secret::new(secret) })
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Consumer secret used in the signing key.
	pub fn secret(&self) -> &Secret {
		&self.secret
	}
}

/// OAuth token (`oauth_token`) and its shared secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	key: String,
	secret: Secret,
}
impl TokenPair {
	/// Creates a token pair, rejecting empty values.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, CredentialError> {
		let key = key.into();
		let secret = secret.into();

		if key.is_empty() {
			return Err(CredentialError::Empty { field: "token" });
		}
		if secret.is_empty() {
			return Err(CredentialError::Empty { field: "token secret" });
		}

		Ok(Self { key, secret: Secret::new(secret) })
	}

	/// Token value sent as `oauth_token`.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Token shared secret used in the signing key.
	pub fn secret(&self) -> &Secret {
		&self.secret
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenState {
	Invalid,
	Request(TokenPair),
	Access(TokenPair),
}

/// Consumer credential plus the token currently used to sign requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenCredential {
	consumer: ConsumerCredential,
	state: TokenState,
}
impl TokenCredential {
	/// Creates a credential that holds no token yet.
	pub fn new(consumer: ConsumerCredential) -> Self {
		Self { consumer, state: TokenState::Invalid }
	}

	/// Creates a credential from previously issued access token values.
	pub fn with_access_token(
		consumer: ConsumerCredential,
		token: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self, CredentialError> {
		let pair = TokenPair::new(token, secret)?;

		Ok(Self { consumer, state: TokenState::Access(pair) })
	}

	/// Consumer credential backing every signature.
	pub fn consumer(&self) -> &ConsumerCredential {
		&self.consumer
	}

	/// Kind of token currently held.
	pub fn kind(&self) -> TokenKind {
		match self.state {
			TokenState::Invalid => TokenKind::Invalid,
			TokenState::Request(_) => TokenKind::Request,
			TokenState::Access(_) => TokenKind::Access,
		}
	}

	/// Token pair for request/access tokens; `None` while invalid.
	pub fn token(&self) -> Option<&TokenPair> {
		match &self.state {
			TokenState::Invalid => None,
			TokenState::Request(pair) | TokenState::Access(pair) => Some(pair),
		}
	}

	/// Returns the held token if it has the expected kind.
	pub fn expect_kind(&self, expected: TokenKind) -> Result<&TokenPair, CredentialError> {
		match (&self.state, expected) {
			(TokenState::Request(pair), TokenKind::Request)
			| (TokenState::Access(pair), TokenKind::Access) => Ok(pair),
			_ => Err(CredentialError::UnexpectedTokenKind { expected, actual: self.kind() }),
		}
	}

	/// Stores temporary credentials, replacing whatever token was held.
	pub fn set_request_token(&mut self, pair: TokenPair) {
		self.state = TokenState::Request(pair);
	}

	/// Stores token credentials, replacing whatever token was held.
	pub fn set_access_token(&mut self, pair: TokenPair) {
		self.state = TokenState::Access(pair);
	}

	/// Drops the held token.
	pub fn invalidate(&mut self) {
		self.state = TokenState::Invalid;
	}

	/// HMAC key: `enc(consumer_secret) & enc(token_secret)`, with an empty token part when
	/// no token is held.
	pub fn signing_key(&self) -> Secret {
		signing_key(&self.consumer, self.token())
	}
}

/// Builds the signing key for a consumer and an optional token.
pub(crate) fn signing_key(consumer: &ConsumerCredential, token: Option<&TokenPair>) -> Secret {
	let token_secret = token.map(|pair| encode::percent_encode(pair.secret().expose()));

	Secret::new(format!(
		"{}&{}",
		encode::percent_encode(consumer.secret().expose()),
		token_secret.unwrap_or_default()
	))
}
