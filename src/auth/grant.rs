//! Token credentials returned by the access-token exchange.

// self
use crate::{
	_prelude::*,
	auth::{CredentialError, TokenPair},
};

/// Access token plus the account details Twitter returns alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
	/// Token credentials.
	pub token: TokenPair,
	/// Numeric user identifier (`user_id`), when the provider reports one.
	pub user_id: Option<String>,
	/// Account handle (`screen_name`), when the provider reports one.
	pub screen_name: Option<String>,
	/// Remaining response fields.
	#[serde(default)]
	pub extra: BTreeMap<String, String>,
	/// Instant the grant was received.
	#[serde(with = "time::serde::rfc3339")]
	pub issued_at: OffsetDateTime,
}
impl AccessGrant {
	/// Wraps a token pair issued now.
	pub fn new(token: TokenPair) -> Self {
		Self {
			token,
			user_id: None,
			screen_name: None,
			extra: BTreeMap::new(),
			issued_at: OffsetDateTime::now_utc(),
		}
	}

	/// Builds a grant from the decoded access-token response fields.
	///
	/// `oauth_token` and `oauth_token_secret` are required; `user_id` and `screen_name` are
	/// lifted out; everything else lands in [`extra`](Self::extra).
	pub fn from_fields(mut fields: BTreeMap<String, String>) -> Result<Self, CredentialError> {
		let key = fields.remove("oauth_token").unwrap_or_default();
		let secret = fields.remove("oauth_token_secret").unwrap_or_default();
		let token = TokenPair::new(key, secret)?;
		let user_id = fields.remove("user_id");
		let screen_name = fields.remove("screen_name");

		Ok(Self { token, user_id, screen_name, extra: fields, issued_at: OffsetDateTime::now_utc() })
	}
}
