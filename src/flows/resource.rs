//! Signed calls to protected resources.

// std
use std::borrow::Cow;
// crates.io
use http::HeaderMap;
// self
use crate::{
	_prelude::*,
	auth::TokenKind,
	flows::OAuthClient,
	http::{OAuthHttpClient, RateLimit},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowSpan},
	provider::{OAuthFlow, ProviderStrategy},
	request::ResourceRequest,
	signer::{ProtocolExtras, SignedRequest},
};

/// Successful (2xx) response from a protected resource.
#[derive(Clone, Debug)]
pub struct ResourceResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
	/// Rate-limit window reported alongside the response.
	pub rate_limit: Option<RateLimit>,
}
impl ResourceResponse {
	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Signs `request` with the held access token without sending it.
	pub fn sign(&self, request: &ResourceRequest) -> Result<SignedRequest> {
		FlowSpan::new(FlowKind::Resource, "sign").in_scope(|| {
			let (consumer, token) = {
				let credential = self.credential.read();
				let pair = credential.expect_kind(TokenKind::Access)?.clone();

				(credential.consumer().clone(), pair)
			};
			let mut extras = ProtocolExtras::default();

			obs::record_token_kind(TokenKind::Access);
			obs::record_endpoint(&request.url);
			<dyn ProviderStrategy>::augment_protocol_params(
				self.strategy.as_ref(),
				OAuthFlow::Resource,
				&mut extras.extra,
			);

			self.signer.sign(&consumer, Some(&token), request, &extras)
		})
	}

	/// Signs and sends `request`.
	///
	/// A token rejection invalidates the credential and removes any persisted grant before the
	/// error is returned.
	pub async fn send(&self, request: ResourceRequest) -> Result<ResourceResponse> {
		obs::observe(FlowKind::Resource, "send", async move {
			let signed = self.sign(&request)?;
			let exchange = match self.dispatch(OAuthFlow::Resource, signed).await {
				Ok(exchange) => exchange,
				Err(e) => {
					self.forget_rejected(&e).await;

					return Err(e);
				},
			};
			let (parts, body) = exchange.response.into_parts();
			let rate_limit = exchange
				.metadata
				.and_then(|meta| meta.rate_limit)
				.or_else(|| RateLimit::from_headers(&parts.headers));

			Ok(ResourceResponse {
				status: parts.status.as_u16(),
				headers: parts.headers,
				body,
				rate_limit,
			})
		})
		.await
	}
}
