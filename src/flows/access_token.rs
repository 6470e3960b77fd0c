//! Token credential exchange (RFC 5849 §2.3).
//!
//! [`OAuthClient::access_token`] signs with the request token, sends `oauth_verifier` (1.0a),
//! and persists the resulting [`AccessGrant`] to the attached credential store before the
//! credential switches to it.

// self
use crate::{
	_prelude::*,
	auth::{AccessGrant, CredentialError, TokenKind},
	flows::{AuthorizationCallback, CallbackError, OAuthClient},
	http::OAuthHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, FlowKind},
	provider::OAuthFlow,
	signer::ProtocolExtras,
	store::CredentialStore,
};

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the held request token and `verifier` for token credentials.
	///
	/// Fails with a credential error unless the client holds a `Request` token. Under 1.0a an
	/// empty verifier is rejected before anything is sent; under 1.0 the verifier is ignored.
	pub async fn access_token(&self, verifier: &str) -> Result<AccessGrant> {
		const FLOW: OAuthFlow = OAuthFlow::AccessToken;

		obs::observe(FlowKind::AccessToken, "access_token", async move {
			let (consumer, request_token) = {
				let credential = self.credential.read();
				let pair = credential.expect_kind(TokenKind::Request)?.clone();

				(credential.consumer().clone(), pair)
			};
			let extras = if self.description.version.signs_callback() {
				if verifier.is_empty() {
					return Err(CredentialError::Empty { field: "verifier" }.into());
				}

				ProtocolExtras::default().with_verifier(verifier)
			} else {
				ProtocolExtras::default()
			};
			let signed = self.sign_endpoint(
				FLOW,
				&self.description.access_token,
				&consumer,
				Some(&request_token),
				extras,
			)?;
			let exchange = match self.dispatch(FLOW, signed).await {
				Ok(exchange) => exchange,
				Err(e) => {
					self.forget_rejected(&e).await;

					return Err(e);
				},
			};
			let fields = oauth::parse_token_response(FLOW, &exchange.response)?;
			let grant = AccessGrant::from_fields(fields)?;

			if let (Some(store), Some(key)) = (self.store.as_deref(), self.store_key()) {
				<dyn CredentialStore>::save(store, key, grant.clone()).await?;
			}

			self.credential.write().set_access_token(grant.token.clone());
			self.pending_callback.lock().take();

			Ok(grant)
		})
		.await
	}

	/// Finishes authorization from the provider redirect.
	///
	/// Checks that the callback refers to the held request token, then runs
	/// [`access_token`](Self::access_token). A denied authorization invalidates the credential
	/// and reports [`Error::TokenRejected`].
	pub async fn complete_authorization(
		&self,
		callback: &AuthorizationCallback,
	) -> Result<AccessGrant> {
		let held = self.credential.read().expect_kind(TokenKind::Request)?.key().to_owned();

		if callback.token() != held {
			return Err(CredentialError::TokenMismatch.into());
		}

		match callback {
			AuthorizationCallback::Denied { .. } => {
				self.credential.write().invalidate();

				Err(Error::TokenRejected { reason: "the user denied authorization".into() })
			},
			AuthorizationCallback::Approved { verifier, .. } => {
				let verifier = match verifier.as_deref() {
					Some(verifier) => verifier,
					None if self.description.version.signs_callback() =>
						return Err(CallbackError::MissingVerifier.into()),
					None => "",
				};

				self.access_token(verifier).await
			},
		}
	}
}
