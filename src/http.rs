//! Transport primitives for signed OAuth requests.
//!
//! The module exposes [`OAuthHttpClient`] alongside [`ResponseMetadata`] and
//! [`ResponseMetadataSlot`] so downstream crates can plug in custom HTTP clients without
//! losing the crate's error classification. Implementations call
//! [`ResponseMetadataSlot::take`] before dispatching a request and
//! [`ResponseMetadataSlot::store`] once an HTTP status, retry hint, or rate-limit window is
//! known.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use http::header::{HeaderMap, RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, request::PreparedRequest};

/// Raw HTTP response handed back by transports.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`OAuthHttpClient::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of sending [`PreparedRequest`]s.
///
/// The trait is the crate's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can be shared across clients, and the
/// returned future must be `Send`.
pub trait OAuthHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and returns the raw response, whatever its status.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the request so stale information
	///   never leaks across retries.
	/// - Once a response arrives, save its status, `Retry-After` hint, and rate-limit headers with
	///   [`ResponseMetadataSlot::store`].
	fn execute(
		&self,
		request: PreparedRequest,
		slot: ResponseMetadataSlot,
	) -> TransportFuture<'_, Self::TransportError>;
}

/// Twitter rate-limit window reported through `x-rate-limit-*` headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
	/// Requests allowed in the current window.
	pub limit: u32,
	/// Requests left in the current window.
	pub remaining: u32,
	/// Instant at which the window resets.
	#[serde(with = "time::serde::timestamp")]
	pub reset: OffsetDateTime,
}
impl RateLimit {
	const LIMIT: &'static str = "x-rate-limit-limit";
	const REMAINING: &'static str = "x-rate-limit-remaining";
	const RESET: &'static str = "x-rate-limit-reset";

	/// Reads the window from response headers; all three headers must be present.
	pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
		let limit = header_number(headers, Self::LIMIT)?;
		let remaining = header_number(headers, Self::REMAINING)?;
		let reset = header_number::<i64>(headers, Self::RESET)?;
		let reset = OffsetDateTime::from_unix_timestamp(reset).ok()?;

		Some(Self { limit, remaining, reset })
	}

	/// Returns true when no requests remain in the window.
	pub fn is_exhausted(&self) -> bool {
		self.remaining == 0
	}
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the provider, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Rate-limit window, when the provider reported one.
	pub rate_limit: Option<RateLimit>,
}
impl ResponseMetadata {
	/// Collects status, retry hint, and rate-limit window from a response head.
	pub fn from_parts(status: u16, headers: &HeaderMap) -> Self {
		Self {
			status: Some(status),
			retry_after: parse_retry_after(headers),
			rate_limit: RateLimit::from_headers(headers),
		}
	}
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
///
/// Flows create a fresh slot for each request and read the captured metadata as soon as
/// the transport resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl OAuthHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: PreparedRequest,
		slot: ResponseMetadataSlot,
	) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			slot.take();

			let response = request.into_reqwest(&client)?.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();

			slot.store(ResponseMetadata::from_parts(status.as_u16(), &headers));

			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Parses a `Retry-After` header given either in seconds or as an RFC 2822 date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(secs.into()));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

fn header_number<T>(headers: &HeaderMap, name: &str) -> Option<T>
where
	T: FromStr,
{
	headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
