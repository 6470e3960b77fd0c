//! Temporary credential acquisition (RFC 5849 §2.1).
//!
//! [`OAuthClient::request_token`] signs a call to the request-token endpoint with the consumer
//! credential alone. Under 1.0a the callback travels as a signed `oauth_callback` parameter
//! and the provider must echo `oauth_callback_confirmed=true`; under 1.0 the callback is held
//! back for the authorization URL instead.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	flows::OAuthClient,
	http::OAuthHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, FlowKind},
	provider::OAuthFlow,
	signer::ProtocolExtras,
};

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Obtains temporary credentials and moves the credential to the `Request` kind.
	///
	/// `callback` defaults to the provider's default callback (`oob` for PIN-based
	/// authorization).
	pub async fn request_token(&self, callback: Option<&str>) -> Result<TokenPair> {
		const FLOW: OAuthFlow = OAuthFlow::RequestToken;

		obs::observe(FlowKind::RequestToken, "request_token", async move {
			let description = &self.description;
			let callback = callback.unwrap_or(&description.quirks.default_callback).to_owned();
			let signs_callback = description.version.signs_callback();
			let extras = if signs_callback {
				ProtocolExtras::default().with_callback(callback.clone())
			} else {
				ProtocolExtras::default()
			};
			let consumer = self.credential.read().consumer().clone();
			let signed =
				self.sign_endpoint(FLOW, &description.request_token, &consumer, None, extras)?;
			let exchange = self.dispatch(FLOW, signed).await?;
			let mut fields = oauth::parse_token_response(FLOW, &exchange.response)?;

			if signs_callback
				&& description.quirks.require_callback_confirmed
				&& fields.get("oauth_callback_confirmed").map(String::as_str) != Some("true")
			{
				return Err(Error::CallbackNotConfirmed);
			}

			let pair = TokenPair::new(
				fields.remove("oauth_token").unwrap_or_default(),
				fields.remove("oauth_token_secret").unwrap_or_default(),
			)?;

			self.credential.write().set_request_token(pair.clone());
			*self.pending_callback.lock() = (!signs_callback).then_some(callback);

			Ok(pair)
		})
		.await
	}
}
