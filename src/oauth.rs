//! Dispatch of signed requests and mapping of failures into the crate's error taxonomy.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	http::{HttpResponse, OAuthHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{OAuthFlow, ProviderErrorContext, ProviderErrorKind, ProviderStrategy},
	request::PreparedRequest,
	signer::encode,
};

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		flow: OAuthFlow,
		metadata: Option<&ResponseMetadata>,
		error: E,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		flow: OAuthFlow,
		meta: Option<&ResponseMetadata>,
		err: ReqwestError,
	) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return TransientError::Endpoint {
				message: format!("Request timed out during the {flow} flow"),
				status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
				retry_after: meta_retry_after(meta),
			}
			.into();
		}
		if err.is_body() || err.is_decode() {
			let ctx = ProviderErrorContext::network_failure(flow);

			if strategy.classify_error(&ctx) == ProviderErrorKind::Transient {
				return TransientError::Endpoint {
					message: format!("Response body could not be read during the {flow} flow"),
					status: meta_status(meta),
					retry_after: meta_retry_after(meta),
				}
				.into();
			}
		}

		TransportError::from(err).into()
	}
}

/// Raw response of a successful (2xx) exchange plus the metadata captured for it.
#[derive(Debug)]
pub(crate) struct Exchange {
	pub(crate) response: HttpResponse,
	pub(crate) metadata: Option<ResponseMetadata>,
}

/// Sends `request`; non-2xx responses are classified through `strategy`.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	strategy: &dyn ProviderStrategy,
	flow: OAuthFlow,
	request: PreparedRequest,
) -> Result<Exchange>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let slot = ResponseMetadataSlot::default();
	let result = http_client.execute(request, slot.clone()).await;
	let metadata = slot.take();
	let response = match result {
		Ok(response) => response,
		Err(e) => return Err(mapper.map_transport_error(strategy, flow, metadata.as_ref(), e)),
	};

	if response.status().is_success() {
		return Ok(Exchange { response, metadata });
	}

	let status = response.status().as_u16();
	let body = String::from_utf8_lossy(response.body());

	#[cfg(feature = "tracing")]
	tracing::debug!(flow = flow.as_str(), status, "provider returned an error response");

	Err(classify_failure(strategy, flow, status, &body, metadata.as_ref()))
}

/// Converts a non-success response into an [`Error`].
pub(crate) fn classify_failure(
	strategy: &dyn ProviderStrategy,
	flow: OAuthFlow,
	status: u16,
	body: &str,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let ctx = ProviderErrorContext::new(flow).with_http_status(status).with_response_body(body);
	let reason = ctx.reason();

	match strategy.classify_error(&ctx) {
		ProviderErrorKind::InvalidConsumer => Error::InvalidConsumer { reason },
		ProviderErrorKind::TokenRejected => Error::TokenRejected { reason },
		ProviderErrorKind::Rejected => Error::Rejected { status, reason },
		ProviderErrorKind::Transient => TransientError::Endpoint {
			message: reason,
			status: Some(status),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

/// Decodes a form-encoded token response into its fields.
pub(crate) fn parse_token_response(
	flow: OAuthFlow,
	response: &HttpResponse,
) -> Result<BTreeMap<String, String>> {
	let status = Some(response.status().as_u16());
	let body = std::str::from_utf8(response.body()).map_err(|_| {
		TransientError::MalformedResponse {
			message: format!("{flow} response is not valid UTF-8"),
			status,
		}
	})?;
	let fields = encode::parse_form(body.trim()).into_iter().collect::<BTreeMap<_, _>>();

	if !fields.contains_key("oauth_token") || !fields.contains_key("oauth_token_secret") {
		return Err(TransientError::MalformedResponse {
			message: format!("{flow} response is missing oauth_token or oauth_token_secret"),
			status,
		}
		.into());
	}

	Ok(fields)
}

#[cfg(feature = "reqwest")]
fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::DefaultProviderStrategy;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			http::StatusCode::from_u16(status).expect("Status fixture should be valid.");

		response
	}

	#[test]
	fn token_response_fields_are_decoded() {
		let fields = parse_token_response(
			OAuthFlow::RequestToken,
			&response(
				200,
				"oauth_token=NPcudxy0yU5T3tBzho7iCotZ3cnetKwcTIRlX0iwRl0&\
				 oauth_token_secret=veNRnAWe6inFuo8o2u8SLLZLjolYDmDP7SzL0YfYI&\
				 oauth_callback_confirmed=true",
			),
		)
		.expect("Token response should parse.");

		assert_eq!(
			fields.get("oauth_token").map(String::as_str),
			Some("NPcudxy0yU5T3tBzho7iCotZ3cnetKwcTIRlX0iwRl0")
		);
		assert_eq!(fields.get("oauth_callback_confirmed").map(String::as_str), Some("true"));
	}

	#[test]
	fn token_response_without_token_is_malformed() {
		let err = parse_token_response(OAuthFlow::AccessToken, &response(200, "<html></html>"))
			.expect_err("Missing fields should fail.");

		assert!(matches!(
			err,
			Error::Transient(TransientError::MalformedResponse { status: Some(200), .. })
		));
	}

	#[test]
	fn failures_map_to_error_variants() {
		let strategy = DefaultProviderStrategy;

		assert!(matches!(
			classify_failure(
				&strategy,
				OAuthFlow::Resource,
				401,
				r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#,
				None,
			),
			Error::TokenRejected { .. }
		));
		assert!(matches!(
			classify_failure(&strategy, OAuthFlow::Resource, 403, "forbidden", None),
			Error::Rejected { status: 403, .. }
		));

		let meta = ResponseMetadata {
			status: Some(503),
			retry_after: Some(Duration::seconds(30)),
			rate_limit: None,
		};

		assert!(matches!(
			classify_failure(&strategy, OAuthFlow::AccessToken, 503, "", Some(&meta)),
			Error::Transient(TransientError::Endpoint { status: Some(503), retry_after: Some(_), .. })
		));
	}
}
