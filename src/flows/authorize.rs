//! Resource owner authorization (RFC 5849 §2.2): the URL the user visits and the redirect
//! that comes back.

// self
use crate::{
	_prelude::*,
	auth::TokenKind,
	flows::OAuthClient,
	http::OAuthHttpClient,
	oauth::TransportErrorMapper,
	provider::OAuthEndPoint,
};

/// Errors raised while reading the authorization redirect.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CallbackError {
	/// The redirect does not carry `oauth_token` (or `denied`).
	#[error("Authorization callback is missing oauth_token.")]
	MissingToken,
	/// The redirect carries a token but no `oauth_verifier`.
	#[error("Authorization callback is missing oauth_verifier.")]
	MissingVerifier,
}

/// Optional knobs for the authorization URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeOptions {
	/// Use the authenticate endpoint ("Sign in with") when the provider has one.
	pub authenticate: bool,
	/// Ask the provider to prompt for credentials even with an active session.
	pub force_login: bool,
	/// Prefill the login form.
	pub screen_name: Option<String>,
}
impl AuthorizeOptions {
	/// Targets the authenticate endpoint.
	pub fn authenticate(mut self) -> Self {
		self.authenticate = true;

		self
	}

	/// Sets `force_login=true`.
	pub fn force_login(mut self) -> Self {
		self.force_login = true;

		self
	}

	/// Sets `screen_name`.
	pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
		self.screen_name = Some(screen_name.into());

		self
	}
}

/// Outcome of the user authorization step, read from the provider redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorizationCallback {
	/// The user approved the request token.
	Approved {
		/// Request token being approved.
		token: String,
		/// Verifier to exchange for token credentials (absent under OAuth 1.0).
		verifier: Option<String>,
	},
	/// The user declined; Twitter reports the request token through `denied`.
	Denied {
		/// Request token that was declined.
		token: String,
	},
}
impl AuthorizationCallback {
	/// Parses the callback URL the provider redirected the user to.
	///
	/// `oauth_verifier` is optional here; [`OAuthClient::complete_authorization`] enforces it for
	/// 1.0a providers.
	pub fn from_url(url: &Url) -> Result<Self, CallbackError> {
		let mut token = None;
		let mut verifier = None;
		let mut denied = None;

		for (name, value) in url.query_pairs() {
			match name.as_ref() {
				"oauth_token" => token = Some(value.into_owned()),
				"oauth_verifier" => verifier = Some(value.into_owned()),
				"denied" => denied = Some(value.into_owned()),
				_ => {},
			}
		}

		if let Some(token) = denied {
			return Ok(Self::Denied { token });
		}

		let token = token.filter(|t| !t.is_empty()).ok_or(CallbackError::MissingToken)?;

		Ok(Self::Approved { token, verifier: verifier.filter(|v| !v.is_empty()) })
	}

	/// Request token the callback refers to.
	pub fn token(&self) -> &str {
		match self {
			Self::Approved { token, .. } | Self::Denied { token } => token,
		}
	}
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// URL of the authorization endpoint for the held request token.
	pub fn authorize_url(&self) -> Result<Url> {
		self.authorize_url_with(&AuthorizeOptions::default())
	}

	/// URL of the authenticate endpoint, falling back to the authorization endpoint when the
	/// provider has none.
	pub fn authenticate_url(&self) -> Result<Url> {
		self.authorize_url_with(&AuthorizeOptions::default().authenticate())
	}

	/// Builds the user authorization URL.
	///
	/// Requires a `Request` token. Under OAuth 1.0 the callback held back by
	/// [`request_token`](Self::request_token) is appended as `oauth_callback`.
	pub fn authorize_url_with(&self, options: &AuthorizeOptions) -> Result<Url> {
		let token = self.credential.read().expect_kind(TokenKind::Request)?.key().to_owned();
		let endpoint: &OAuthEndPoint = match (&self.description.authenticate, options.authenticate)
		{
			(Some(authenticate), true) => authenticate,
			_ => &self.description.authorize,
		};
		let mut url = endpoint.url.clone();

		{
			let mut query = url.query_pairs_mut();

			query.append_pair("oauth_token", &token);

			if let Some(callback) = self.pending_callback.lock().as_deref() {
				query.append_pair("oauth_callback", callback);
			}
			if options.force_login {
				query.append_pair("force_login", "true");
			}
			if let Some(screen_name) = &options.screen_name {
				query.append_pair("screen_name", screen_name);
			}
		}

		Ok(url)
	}
}
