//! Shared helpers for flow implementations (signing, dispatch, rejection handling, storage).

// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredential, TokenKind, TokenPair},
	error::ConfigError,
	flows::OAuthClient,
	http::OAuthHttpClient,
	oauth::{self, Exchange, TransportErrorMapper},
	obs,
	provider::{OAuthEndPoint, OAuthFlow, ProviderStrategy},
	request::ResourceRequest,
	signer::{ProtocolExtras, SignedRequest},
	store::{CredentialStore, StoreKey},
};

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Key grants are stored under, when a store and an account are attached.
	pub fn store_key(&self) -> Option<StoreKey> {
		self.account.clone().map(|account| StoreKey::new(self.description.id.clone(), account))
	}

	pub(crate) fn attached_store(&self) -> Result<(&dyn CredentialStore, StoreKey)> {
		match (self.store.as_deref(), self.store_key()) {
			(Some(store), Some(key)) => Ok((store, key)),
			_ => Err(ConfigError::StoreNotAttached.into()),
		}
	}

	/// Signs a bare call to a token endpoint with the strategy's extra parameters merged in.
	pub(crate) fn sign_endpoint(
		&self,
		flow: OAuthFlow,
		endpoint: &OAuthEndPoint,
		consumer: &ConsumerCredential,
		token: Option<&TokenPair>,
		mut extras: ProtocolExtras,
	) -> Result<SignedRequest> {
		<dyn ProviderStrategy>::augment_protocol_params(
			self.strategy.as_ref(),
			flow,
			&mut extras.extra,
		);

		let signing_with = if token.is_some() { TokenKind::Request } else { TokenKind::Invalid };

		obs::record_endpoint(&endpoint.url);
		obs::record_token_kind(signing_with);

		let request = ResourceRequest::new(endpoint.method, endpoint.url.clone());

		self.signer.sign(consumer, token, &request, &extras)
	}

	pub(crate) async fn dispatch(&self, flow: OAuthFlow, signed: SignedRequest) -> Result<Exchange> {
		oauth::dispatch(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			self.strategy.as_ref(),
			flow,
			signed.prepared,
		)
		.await
	}

	/// Drops the held token after the provider rejected it, including any persisted copy.
	///
	/// A failing store removal is logged and does not mask the rejection.
	pub(crate) async fn forget_rejected(&self, error: &Error) {
		if !matches!(error, Error::TokenRejected { .. }) {
			return;
		}

		#[cfg(feature = "tracing")]
		tracing::info!(provider = %self.description.id, "token rejected; invalidating credential");

		self.credential.write().invalidate();

		let (Some(store), Some(key)) = (self.store.as_deref(), self.store_key()) else {
			return;
		};

		if let Err(_e) = store.remove(&key).await {
			#[cfg(feature = "tracing")]
			tracing::warn!(key = %key, error = %_e, "failed to remove rejected grant from store");
		}
	}
}
