//! OAuth 1.0a flow orchestrators: request token, user authorization, access token, and signed
//! resource requests.

pub mod authorize;
pub mod common;
pub mod resource;

mod access_token;
mod request_token;
mod restore;

pub use authorize::*;
pub use resource::*;

// self
use crate::{
	_prelude::*,
	auth::{AccountId, TokenCredential, TokenKind},
	http::OAuthHttpClient,
	oauth::TransportErrorMapper,
	provider::{ProviderStrategy, ServiceProviderDescription},
	signer::Signer,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")]
use crate::{
	http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper, provider::DefaultProviderStrategy,
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuthClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Drives the OAuth 1.0a flows against a single service provider.
///
/// The client owns the HTTP transport, the provider description and strategy, the signer,
/// and the current [`TokenCredential`]. The credential lives behind a lock so a cloned client
/// observes the same token transitions: `request_token` moves it to
/// [`TokenKind::Request`], `access_token` to [`TokenKind::Access`], and a provider rejection
/// back to [`TokenKind::Invalid`].
///
/// Attach a [`CredentialStore`] with [`OAuthClient::with_store`] to persist access grants under
/// an [`AccountId`] and reload them with [`OAuthClient::restore`].
pub struct OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider description that defines endpoints and quirks.
	pub description: ServiceProviderDescription,
	/// Strategy responsible for provider-specific parameters and error classification.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Request signer configured from the description.
	pub signer: Signer,
	/// Optional persistence for access grants.
	pub store: Option<Arc<dyn CredentialStore>>,
	/// Account the persisted grant belongs to.
	pub account: Option<AccountId>,
	credential: Arc<RwLock<TokenCredential>>,
	pending_callback: Arc<Mutex<Option<String>>>,
}
impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		description: ServiceProviderDescription,
		strategy: Arc<dyn ProviderStrategy>,
		credential: TokenCredential,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let signer = Signer::for_provider(&description);

		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			description,
			strategy,
			signer,
			store: None,
			account: None,
			credential: Arc::new(RwLock::new(credential)),
			pending_callback: Default::default(),
		}
	}

	/// Attaches a credential store and the account grants are saved under.
	pub fn with_store(mut self, store: Arc<dyn CredentialStore>, account: AccountId) -> Self {
		self.store = Some(store);
		self.account = Some(account);

		self
	}

	/// Replaces the signer (for example to pin the nonce source).
	pub fn with_signer(mut self, signer: Signer) -> Self {
		self.signer = signer;

		self
	}

	/// Snapshot of the current credential.
	pub fn credential(&self) -> TokenCredential {
		self.credential.read().clone()
	}

	/// Kind of token currently held.
	pub fn token_kind(&self) -> TokenKind {
		self.credential.read().kind()
	}

	/// Replaces the credential wholesale.
	pub fn set_credential(&self, credential: TokenCredential) {
		*self.credential.write() = credential;
	}
}
#[cfg(feature = "reqwest")]
impl OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with its own reqwest transport and the default strategy.
	pub fn new(description: ServiceProviderDescription, credential: TokenCredential) -> Self {
		Self::with_http_client(
			description,
			Arc::new(DefaultProviderStrategy),
			credential,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			description: self.description.clone(),
			strategy: self.strategy.clone(),
			signer: self.signer.clone(),
			store: self.store.clone(),
			account: self.account.clone(),
			credential: self.credential.clone(),
			pending_callback: self.pending_callback.clone(),
		}
	}
}
impl<C, M> Debug for OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("description", &self.description.id)
			.field("signer", &self.signer)
			.field("token_kind", &self.token_kind())
			.field("store_attached", &self.store.is_some())
			.field("account", &self.account)
			.finish()
	}
}
